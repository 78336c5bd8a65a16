pub mod direction;
pub mod side;
