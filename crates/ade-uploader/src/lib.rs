//! Uploader integration.
//!
//! The uploader is an external Java CLI. This crate builds its command line,
//! runs its subcommands (`userInfo`, `pipeline --list`, `patient -c/-l`) and
//! relays the one-time token challenge it raises when acting for an
//! alternate client.

pub mod command;
pub mod error;
pub mod operator;
pub mod relay;
pub mod services;
pub mod token_card;

pub use command::{CommandOutput, DEFAULT_JAR, UploaderCommand};
pub use error::{RelayError, TokenCardError, UploaderError};
pub use operator::{Operator, ScriptedOperator, TerminalOperator};
pub use relay::{Credentials, RelayOutcome, TokenRelay, read_prompt};
pub use services::{
    AlternateClient, Pipeline, create_patients, fetch_bindings, list_patients, list_pipelines,
    parse_pipelines, parse_user_info, patient_ref_arg, select_pipeline, user_info,
};
pub use token_card::{TokenCard, TokenCoordinate, contains_coordinates};
