//! Posts, users and comments: resource clients, the join into display posts,
//! and the cache-first repository on top of them.

pub mod aggregate;
pub mod api_types;
pub mod cache;
pub mod client;
pub mod fixture;
pub mod remote;
pub mod repository;
pub mod types;

pub use aggregate::assemble;
pub use api_types::{CommentDto, NewPost, PostDto, UserDto};
pub use client::{make_client, ResourceClient};
pub use fixture::FixtureClient;
pub use remote::RemoteClient;
pub use repository::PostRepository;
pub use types::{DisplayComment, DisplayPost};
