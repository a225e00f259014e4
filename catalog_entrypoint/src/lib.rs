#![deny(missing_docs)]
//! This crate provides the initialization process shared by the catalog binaries.
//! It loads `.env` files and installs the tracing configuration for the current [Environment].

use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};
use tracing_tree::HierarchicalLayer;

mod environment;

pub use environment::{Environment, UnknownValue};

/// Indentation of the hierarchical tracing output, only read in [Environment::Local]
const TREE_TRACING_VAR: &str = "TREE_TRACING";

/// unit struct which defines the behaviour for instantiation
#[derive(Debug)]
pub struct CatalogEntrypoint {
    env: Environment,
    /// `Some(indent)` switches local output to a [HierarchicalLayer]
    tree_tracing: Option<usize>,
}

impl Default for CatalogEntrypoint {
    fn default() -> Self {
        // .env has to be read before the environment is resolved
        dotenv::dotenv().ok();
        CatalogEntrypoint {
            env: Environment::new_or_prod(),
            tree_tracing: parse_tree_tracing(std::env::var(TREE_TRACING_VAR).ok().as_deref()),
        }
    }
}

/// sentinel struct which guarantees that we called [CatalogEntrypoint::init]
#[derive(Debug)]
pub struct InitializedEntrypoint(());

impl CatalogEntrypoint {
    /// consume self, initialize this binary, and return a proof that it was initialized
    /// [InitializedEntrypoint]
    pub fn init(self) -> InitializedEntrypoint {
        std::panic::set_hook(Box::new(tracing_panic::panic_hook));

        match (self.env, self.tree_tracing) {
            (Environment::Local, None) => {
                tracing_subscriber::fmt()
                    .with_ansi(true)
                    .with_env_filter(EnvFilter::from_default_env())
                    .with_file(true)
                    .with_line_number(true)
                    .pretty()
                    .init();
            }
            (Environment::Local, Some(indent)) => {
                let subscriber = Registry::default()
                    .with(EnvFilter::from_default_env())
                    .with(HierarchicalLayer::new(indent));
                if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
                    eprintln!("unable to install tree tracing subscriber: {e}");
                }
            }
            (Environment::Production | Environment::Develop, _) => {
                tracing_subscriber::fmt()
                    .with_ansi(false)
                    .with_env_filter(EnvFilter::from_default_env())
                    .with_file(true)
                    .with_line_number(true)
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .flatten_event(true)
                    .init();
            }
        }

        tracing::debug!(
            environment = %self.env,
            tree_tracing = ?self.tree_tracing,
            "initialized entrypoint"
        );

        InitializedEntrypoint(())
    }
}

/// A positive indentation enables tree tracing, anything else leaves it off
fn parse_tree_tracing(raw: Option<&str>) -> Option<usize> {
    raw?.trim().parse::<usize>().ok().filter(|indent| *indent > 0)
}
