mod client;

pub use client::NewsClient;
