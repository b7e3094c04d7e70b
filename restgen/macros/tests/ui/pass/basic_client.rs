use restgen_macros::{api_client, get, post};

pub struct User;
pub struct NewUser;
pub struct ClientError;

#[api_client]
pub trait Users {
    #[get("/users/{id}")]
    fn user(&self, id: u64) -> Result<User, ClientError>;

    #[post("/users")]
    fn create(&self, #[body] user: NewUser) -> Result<User, ClientError>;

    fn helper(&self) {}
}

#[api_client(name = "AccountsHttp")]
pub trait Accounts {
    #[restgen_macros::delete("/accounts/{id}")]
    fn remove(&self, id: String) -> Result<(), ClientError>;
}

fn main() {}
