mod client;
mod links;

pub use client::HttpClient;
pub use links::links_with_extension;
