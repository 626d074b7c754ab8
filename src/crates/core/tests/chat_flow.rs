use async_trait::async_trait;
use cadpilot_core::assistant::docs::{builtin_catalog, DocsRetriever};
use cadpilot_core::assistant::runner::{ExecutionOutcome, ScriptRunner};
use cadpilot_core::assistant::ChatSession;
use cadpilot_core::infrastructure::ai::ModelGateway;
use cadpilot_core::service::config::Settings;
use cadpilot_core::{CadPilotError, CadPilotResult};
use cadpilot_core_types::PanelRequest;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const CUBE_SCRIPT: &str = r#"import adsk.core
import traceback

def run(context):
    ui = None
    try:
        app = adsk.core.Application.get()
        ui = app.userInterface
    except:
        if ui:
            ui.messageBox('Failed:\n{}'.format(traceback.format_exc()))
"#;

const REVOLVE_SCRIPT: &str = r#"import adsk.core
import traceback

def run(context):
    ui = None
    try:
        app = adsk.core.Application.get()
        ui = app.userInterface
        revolves = rootComp.features.revolveFeatures
    except:
        if ui:
            ui.messageBox('Failed:\n{}'.format(traceback.format_exc()))
"#;

const TANGENT_TRACE: &str =
    "Error executing script (exit 1):\nRuntimeError: ERROR 3: ASM_PATH_TANGENT - the axis is tangent to the profile";

fn fenced(code: &str) -> String {
    format!("Here you go.\n```python\n{}\n```", code)
}

struct ScriptedGateway {
    replies: Mutex<VecDeque<String>>,
    calls: Arc<AtomicUsize>,
    user_instructions: Arc<Mutex<Vec<String>>>,
}

impl ScriptedGateway {
    fn new(replies: Vec<String>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Arc::new(AtomicUsize::new(0)),
            user_instructions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn probes(&self) -> (Arc<AtomicUsize>, Arc<Mutex<Vec<String>>>) {
        (self.calls.clone(), self.user_instructions.clone())
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn complete(&self, _system: &str, user: &str) -> CadPilotResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.user_instructions
            .lock()
            .expect("instruction log")
            .push(user.to_string());
        self.replies
            .lock()
            .expect("scripted replies")
            .pop_front()
            .ok_or_else(|| CadPilotError::AiClient("no scripted reply left".to_string()))
    }
}

struct ScriptedRunner {
    outcomes: Mutex<VecDeque<ExecutionOutcome>>,
    submitted: Arc<Mutex<Vec<String>>>,
}

impl ScriptedRunner {
    fn new(outcomes: Vec<ExecutionOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            submitted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn submissions(&self) -> Arc<Mutex<Vec<String>>> {
        self.submitted.clone()
    }
}

#[async_trait]
impl ScriptRunner for ScriptedRunner {
    async fn submit(&self, code: &str) -> ExecutionOutcome {
        self.submitted
            .lock()
            .expect("submission log")
            .push(code.to_string());
        self.outcomes
            .lock()
            .expect("scripted outcomes")
            .pop_front()
            .unwrap_or(ExecutionOutcome::Succeeded { detail: None })
    }
}

fn session(gateway: ScriptedGateway, runner: ScriptedRunner) -> ChatSession {
    ChatSession::new(
        Box::new(gateway),
        Box::new(runner),
        DocsRetriever::new(builtin_catalog()),
        &Settings::default(),
    )
}

#[tokio::test]
async fn plain_request_runs_the_generated_code() {
    let gateway = ScriptedGateway::new(vec![fenced(CUBE_SCRIPT)]);
    let (calls, instructions) = gateway.probes();
    let runner = ScriptedRunner::new(vec![]);
    let submissions = runner.submissions();
    let mut session = session(gateway, runner);

    let response = session
        .handle_message(PanelRequest::from_text("create a 10mm cube"))
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    // The plain request was rewritten into an explicit code request.
    let recorded = instructions.lock().expect("instruction log");
    assert!(recorded[0].contains("executable Fusion 360 Python script"));
    assert!(recorded[0].contains("create a 10mm cube"));

    assert_eq!(submissions.lock().expect("submissions").len(), 1);
    assert!(response.text.contains("**Execution Result:**"));
    assert!(response.text.contains("executed successfully"));
}

#[tokio::test]
async fn recognized_failure_retries_exactly_once() {
    let gateway = ScriptedGateway::new(vec![fenced(REVOLVE_SCRIPT), fenced(REVOLVE_SCRIPT)]);
    let (calls, instructions) = gateway.probes();
    let runner = ScriptedRunner::new(vec![
        ExecutionOutcome::Failed {
            error: TANGENT_TRACE.to_string(),
        },
        ExecutionOutcome::Failed {
            error: TANGENT_TRACE.to_string(),
        },
    ]);
    let submissions = runner.submissions();
    let mut session = session(gateway, runner);

    let response = session
        .handle_message(PanelRequest::from_text("revolve this profile"))
        .await;

    // One user call plus exactly one automatic follow-up, then stop.
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(submissions.lock().expect("submissions").len(), 2);

    let recorded = instructions.lock().expect("instruction log");
    assert!(recorded[1].contains("Fix the previous error"));
    assert!(recorded[1].contains("ASM_PATH_TANGENT"));

    assert!(response.text.contains("ASM_PATH_TANGENT"));
    assert!(response.text.contains("**Suggested Fix:**"));
    assert!(response.text.contains("axis is tangent"));
    assert!(response.text.contains("**Improved Solution:**"));
}

#[tokio::test]
async fn unrecognized_failure_gets_a_tip_and_no_retry() {
    let gateway = ScriptedGateway::new(vec![fenced(CUBE_SCRIPT)]);
    let (calls, _) = gateway.probes();
    let runner = ScriptedRunner::new(vec![ExecutionOutcome::Failed {
        error: "Error executing script (exit 1):\nIndexError: list index out of range".to_string(),
    }]);
    let mut session = session(gateway, runner);

    let response = session
        .handle_message(PanelRequest::from_text("create a 10mm cube"))
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(response.text.contains("IndexError"));
    assert!(response.text.contains("**Tip:**"));
    assert!(!response.text.contains("**Improved Solution:**"));
}

#[tokio::test]
async fn execute_previous_command_reuses_the_latest_code() {
    let gateway = ScriptedGateway::new(vec![fenced(CUBE_SCRIPT)]);
    let (calls, _) = gateway.probes();
    let runner = ScriptedRunner::new(vec![]);
    let submissions = runner.submissions();
    let mut session = session(gateway, runner);

    session
        .handle_message(PanelRequest::from_text("create a 10mm cube"))
        .await;
    let response = session
        .handle_message(PanelRequest::from_text("execute the previous code"))
        .await;

    // The command skips the model entirely.
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let submitted = submissions.lock().expect("submissions");
    assert_eq!(submitted.len(), 2);
    assert_eq!(submitted[0], submitted[1]);
    assert!(response.text.starts_with("**Execution Result:**"));
}

#[tokio::test]
async fn execute_previous_without_history_reports_no_code() {
    let gateway = ScriptedGateway::new(vec![]);
    let (calls, _) = gateway.probes();
    let runner = ScriptedRunner::new(vec![]);
    let submissions = runner.submissions();
    let mut session = session(gateway, runner);

    let response = session
        .handle_message(PanelRequest::from_text("execute the previous code"))
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(submissions.lock().expect("submissions").is_empty());
    assert!(response.text.contains("No code found to execute"));
}

#[tokio::test]
async fn pasted_code_wins_over_history() {
    let gateway = ScriptedGateway::new(vec![]);
    let runner = ScriptedRunner::new(vec![]);
    let submissions = runner.submissions();
    let mut session = session(gateway, runner);

    session
        .handle_message(PanelRequest {
            text: "execute the previous code".to_string(),
            code: Some(fenced(CUBE_SCRIPT)),
        })
        .await;

    let submitted = submissions.lock().expect("submissions");
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0], CUBE_SCRIPT.trim());
}

#[tokio::test]
async fn blocking_validation_stops_execution() {
    let gateway = ScriptedGateway::new(vec![fenced("print('hello')")]);
    let runner = ScriptedRunner::new(vec![]);
    let submissions = runner.submissions();
    let mut session = session(gateway, runner);

    let response = session
        .handle_message(PanelRequest::from_text("create a 10mm cube"))
        .await;

    assert!(submissions.lock().expect("submissions").is_empty());
    assert!(response.text.contains("Validation failed"));
    assert!(response.text.contains("entry point"));
}

#[tokio::test]
async fn skip_marker_suppresses_auto_execution() {
    let gateway = ScriptedGateway::new(vec![fenced(CUBE_SCRIPT)]);
    let runner = ScriptedRunner::new(vec![]);
    let submissions = runner.submissions();
    let mut session = session(gateway, runner);

    let response = session
        .handle_message(PanelRequest::from_text(
            "write code for a 10mm cube but don't execute it yet",
        ))
        .await;

    assert!(submissions.lock().expect("submissions").is_empty());
    assert!(!response.text.contains("**Execution Result:**"));
}

#[tokio::test]
async fn fix_intent_pulls_recent_errors_into_the_prompt() {
    let gateway = ScriptedGateway::new(vec![fenced(CUBE_SCRIPT), fenced(CUBE_SCRIPT)]);
    let (_, instructions) = gateway.probes();
    let runner = ScriptedRunner::new(vec![ExecutionOutcome::Failed {
        error: "NameError: name 'rootComp' is not defined\n  File \"unit.py\", line 9".to_string(),
    }]);
    let mut session = session(gateway, runner);

    session
        .handle_message(PanelRequest::from_text("create a 10mm cube"))
        .await;
    session
        .handle_message(PanelRequest::from_text("please fix the error"))
        .await;

    let recorded = instructions.lock().expect("instruction log");
    assert!(recorded[1].contains("Recent errors to avoid"));
    assert!(recorded[1].contains("NameError: name 'rootComp' is not defined"));
    // Only the first line of each failure is carried.
    assert!(!recorded[1].contains("line 9"));
}
