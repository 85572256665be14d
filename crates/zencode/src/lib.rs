//! Core library for `ZenDSL`: a Given/When/Then scripting language for
//! driving cryptographic operations over a small, typed memory model.
//!
//! A script is parsed once into a bound [`Script`](parser::Script), then run
//! as many times as needed against different `DATA`/`KEYS` JSON documents.
//! [`Engine`] owns the handler and schema registries a script's `Scenario`
//! lines populate and ties parsing and execution together.

mod ast;
mod builtins;
mod context;
mod converter;
mod engine;
mod error;
mod executor;
mod panic;
mod parser;
mod phase;
mod registry;
mod schema;
mod traceback;
mod value;

pub use ast::AstNode;
pub use context::{Compartments, GivenView, ThenView, Tmp, WhenView};
pub use converter::{ConverterFn, ConverterRegistry};
pub use engine::Engine;
pub use error::ZenError;
pub use executor::RunFailure;
pub use panic::panic_message;
pub use parser::Script;
pub use phase::Phase;
pub use registry::{
    BoundHandler, EmptyScenarioLoader, GivenHandler, Registries, ScenarioLoader, ScenarioPlugin,
    ThenHandler, WhenHandler,
};
pub use schema::{SchemaFn, SchemaRegistry};
pub use traceback::Traceback;
pub use value::{Octet, Value};
