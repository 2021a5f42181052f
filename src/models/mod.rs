pub mod contact;
pub mod review;
