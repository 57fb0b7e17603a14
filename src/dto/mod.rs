mod requests;

pub use requests::{CheepFields, LoginQuery, LoginRequest, NewCheep};
