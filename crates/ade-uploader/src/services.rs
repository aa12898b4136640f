//! Uploader subcommands: user info, pipelines and patient identities.

use ade_model::{ClientIdentity, IdentityBindings, PipelineSelection, UNRESOLVED_ID};
use ade_request::extract_bindings;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::command::UploaderCommand;
use crate::error::{RelayError, UploaderError};
use crate::operator::Operator;
use crate::relay::{Credentials, TokenRelay};

/// `userInfo` response. Missing fields stay unresolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserInfo {
    user_id: Option<i64>,
    client_id: Option<i64>,
}

/// Read user and client ids from `userInfo` output.
pub fn parse_user_info(stdout: &str) -> ClientIdentity {
    match serde_json::from_str::<UserInfo>(stdout.trim()) {
        Ok(info) => ClientIdentity {
            user_id: info.user_id.unwrap_or(UNRESOLVED_ID),
            client_id: info.client_id.unwrap_or(UNRESOLVED_ID),
        },
        Err(err) => {
            error!(%err, "couldn't retrieve userInfo");
            ClientIdentity::unresolved()
        }
    }
}

/// Fetch the logged-in user's ids.
pub fn user_info(command: &UploaderCommand) -> Result<ClientIdentity, UploaderError> {
    info!("fetching userInfo");
    let output = command.run(&["userInfo".to_string()])?;
    Ok(parse_user_info(&output.stdout))
}

/// One entry of `pipeline --list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    pub pipeline_id: i64,
    pub pipeline_name: String,
    pub sequencer_id: i64,
    #[serde(default)]
    pub sequencer: Option<String>,
    #[serde(default)]
    pub analysis_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PipelineList {
    One(Pipeline),
    Many(Vec<Pipeline>),
}

/// Decode `pipeline --list` output; a single pipeline is printed bare.
pub fn parse_pipelines(stdout: &str) -> Result<Vec<Pipeline>, UploaderError> {
    let list: PipelineList =
        serde_json::from_str(stdout.trim()).map_err(UploaderError::PipelineDecode)?;
    Ok(match list {
        PipelineList::One(pipeline) => vec![pipeline],
        PipelineList::Many(pipelines) => pipelines,
    })
}

pub fn list_pipelines(command: &UploaderCommand) -> Result<Vec<Pipeline>, UploaderError> {
    info!("fetching available pipelines");
    let output = command.run(&["pipeline".to_string(), "--list".to_string()])?;
    parse_pipelines(&output.stdout)
}

/// Resolve the pipeline to use and its sequencer.
///
/// Without `requested`, the pipelines are listed and the operator picks one.
/// An unknown or non-numeric choice leaves the sequencer unresolved.
pub fn select_pipeline(
    pipelines: &[Pipeline],
    requested: Option<i64>,
    operator: &mut dyn Operator,
) -> Result<PipelineSelection, UploaderError> {
    let pipeline_id = match requested {
        Some(id) => id,
        None => {
            operator
                .say("Available pipelines")
                .map_err(UploaderError::Operator)?;
            for pipeline in pipelines {
                operator
                    .say(&format!(
                        "{:5}: {}",
                        pipeline.pipeline_id, pipeline.pipeline_name
                    ))
                    .map_err(UploaderError::Operator)?;
            }
            let answer = operator
                .ask("Enter pipeline ID: ")
                .map_err(UploaderError::Operator)?;
            answer.trim().parse().unwrap_or(UNRESOLVED_ID)
        }
    };

    let sequencer_id = pipelines
        .iter()
        .find(|pipeline| pipeline.pipeline_id == pipeline_id)
        .map_or(UNRESOLVED_ID, |pipeline| pipeline.sequencer_id);
    if sequencer_id == UNRESOLVED_ID {
        warn!(pipeline_id, "pipeline not available to this user");
    }
    Ok(PipelineSelection {
        pipeline_id,
        sequencer_id,
    })
}

/// An alternate client the patient calls are made for, authorized through
/// the token relay.
///
/// Unless fixed credentials are given, the operator is asked for a username
/// and password before every call.
pub struct AlternateClient<'a> {
    pub client_id: i64,
    credentials: Option<Credentials>,
    relay: TokenRelay<'a>,
}

impl<'a> AlternateClient<'a> {
    pub fn new(client_id: i64, relay: TokenRelay<'a>) -> Self {
        Self {
            client_id,
            credentials: None,
            relay,
        }
    }

    /// Client that reuses `credentials` for every call.
    pub fn with_credentials(
        client_id: i64,
        credentials: Credentials,
        relay: TokenRelay<'a>,
    ) -> Self {
        Self {
            client_id,
            credentials: Some(credentials),
            relay,
        }
    }

    fn credentials(&mut self) -> Result<Credentials, UploaderError> {
        match &self.credentials {
            Some(credentials) => Ok(credentials.clone()),
            None => Credentials::ask(self.relay.operator()).map_err(UploaderError::Operator),
        }
    }

    /// Run one call through the relay. A missing prompt yields empty output.
    fn call(
        &mut self,
        command: &UploaderCommand,
        mut args: Vec<String>,
    ) -> Result<String, UploaderError> {
        let credentials = self.credentials()?;
        args.extend([
            "--client-id".to_string(),
            self.client_id.to_string(),
            "-u".to_string(),
            credentials.username,
            "-p".to_string(),
            credentials.password,
        ]);
        match self.relay.run(command, &args) {
            Ok(outcome) => Ok(outcome.stdout),
            Err(RelayError::PromptNotFound { partial }) => {
                error!(read = %partial.trim(), "couldn't read token prompt from uploader");
                Ok(String::new())
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// `--patient-ref=<a,b,..>`
pub fn patient_ref_arg(patient_refs: &[&str]) -> String {
    format!("--patient-ref={}", patient_refs.join(","))
}

fn patient_call(
    command: &UploaderCommand,
    args: Vec<String>,
    alternate: Option<&mut AlternateClient<'_>>,
) -> Result<String, UploaderError> {
    match alternate {
        Some(client) => client.call(command, args),
        None => Ok(command.run(&args)?.stdout),
    }
}

/// Create the patients (`patient -c`). Existing patients are left as they are
/// by the service.
pub fn create_patients(
    command: &UploaderCommand,
    patient_refs: &[&str],
    alternate: Option<&mut AlternateClient<'_>>,
) -> Result<(), UploaderError> {
    info!(patient_count = patient_refs.len(), "creating patients");
    let args = vec![
        "patient".to_string(),
        "-c".to_string(),
        patient_ref_arg(patient_refs),
    ];
    patient_call(command, args, alternate)?;
    Ok(())
}

/// List the patients (`patient -l`) and return the raw output.
pub fn list_patients(
    command: &UploaderCommand,
    patient_refs: &[&str],
    alternate: Option<&mut AlternateClient<'_>>,
) -> Result<String, UploaderError> {
    info!(patient_count = patient_refs.len(), "listing patients");
    let args = vec![
        "patient".to_string(),
        "-l".to_string(),
        patient_ref_arg(patient_refs),
    ];
    patient_call(command, args, alternate)
}

/// Create then list the patients, returning their identity bindings.
pub fn fetch_bindings(
    command: &UploaderCommand,
    patient_refs: &[&str],
    mut alternate: Option<&mut AlternateClient<'_>>,
) -> Result<IdentityBindings, UploaderError> {
    create_patients(command, patient_refs, alternate.as_deref_mut())?;
    let listing = list_patients(command, patient_refs, alternate)?;
    let bindings = extract_bindings(&listing)?;
    info!(binding_count = bindings.len(), "parsed patient ids");
    Ok(bindings)
}
