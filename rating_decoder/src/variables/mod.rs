//! Variable reference tokens
//!
//! `grammar` parses tokens such as `GI_84`, `~PC_456.2` or `DGR_4740` into a
//! typed [`VariableRef`]; `resolver` turns a token into a human description
//! using an explicitly supplied [`LookupContext`].

pub mod grammar;
pub mod resolver;

pub use grammar::{
    is_variable_token, looks_like_variable, parse_variable, VariableError, VariableMarker,
    VariablePrefix, VariableRef,
};
pub use resolver::{describe, LookupContext};
