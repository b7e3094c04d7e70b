//! Everything a declaration module needs, in one import.
//!
//! ```rust,ignore
//! use restgen::prelude::*;
//! ```

pub use crate::{
    CancellationToken, ClientCore, ClientError, JsonCodec, QueryParams, ReqwestTransport, Task,
    Transport, api_client, delete, generate_serializer, get, post, put,
};
