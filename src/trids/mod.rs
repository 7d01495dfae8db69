pub mod hedge_iterator;
pub mod hull;
pub mod tri_data_structure;
pub mod tri_iterator;
