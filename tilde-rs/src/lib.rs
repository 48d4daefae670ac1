//! Scoped `~{name}` placeholder expansion for configuration values.
//!
//! Configuration sections nest (cluster → daemon → sampler).  Each level's
//! plain string definitions become a [`Frame`] pushed on a [`ScopeStack`];
//! values are then expanded against the stack, innermost definition first.
//!
//! ```rust
//! use tilde::{Expander, Frame, ScopeStack};
//!
//! let mut stack = ScopeStack::with_global(Frame::from([("cluster", "c1")]));
//! stack.push(Frame::from([("daemon", "agg1"), ("log", "/var/log/~{cluster}/~{daemon}.log")]));
//!
//! let expander = Expander::new();
//! assert!(expander.expand_key("log", &mut stack).unwrap());
//! assert_eq!(stack.innermost().get("log"), Some("/var/log/c1/agg1.log"));
//!
//! let e = expander.expand_value("~{daemon}:~{port}", &stack);
//! assert_eq!(e.text, "agg1:~{port}");
//! assert_eq!(e.unresolved, ["port"]);
//! stack.pop().unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod expand;
pub mod logging;
pub mod scope;
pub mod token;

pub use error::{Error, Result};
pub use expand::{expand_key, expand_value, Expander, Expansion, TraceEvent};
pub use scope::{Frame, Resolution, ScopeGuard, ScopeStack};
pub use token::{scan, Token, Tokens};
