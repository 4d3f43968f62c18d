pub mod api_types;
pub mod http_client;
pub mod loader;
pub mod mapper;
pub mod reqwest_client;

pub use api_types::RemoteFeedItem;
pub use http_client::{HttpClient, HttpClientError, HttpResponse};
pub use loader::{RemoteFeedLoader, RemoteLoadError};
pub use reqwest_client::ReqwestHttpClient;
