pub mod entities;
pub mod phone;
pub mod use_cases;
