//! Client for the Rippletide agent evaluation API.
//!
//! ```no_run
//! use rippletide::{AgentSpec, ClientConfig, RippletideClient};
//!
//! # async fn run() -> Result<(), rippletide::ClientError> {
//! let client = RippletideClient::new(ClientConfig::default().with_api_key("abc"))?;
//! let agent = client.create_agent(AgentSpec::new("support-bot")).await?;
//! let agent_id = agent["id"].as_str().unwrap_or_default();
//! let report = client.evaluate(agent_id, "What is 2+2?", None).await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod pdf;
pub mod protocol;
pub mod seed;

pub use auth::AuthMode;
pub use client::{Payload, RippletideClient};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ClientError, ClientResult};
pub use pdf::PdfSource;
pub use protocol::AgentSpec;
pub use seed::{FixedSeed, SeedSource, StdRngSeeds, ThreadRngSeeds};
