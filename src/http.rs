//! HTTP values module.
//!
//! Request and response types carried through a pipeline.
//!
//! # Examples
//!
//! ```rust
//! use stackline::http::{Request, Response};
//!
//! let request = Request::builder().uri("/users").build().unwrap();
//! let response = Response::ok().with_body("ok");
//! # assert_eq!(request.path(), "/users");
//! # assert_eq!(response.body_text(), "ok");
//! ```

pub use stackline_http::*;
