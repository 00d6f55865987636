//! Drives an ordered shot list end to end.

use crate::{
    ContinuityTracker, FailurePolicy, PromptCompiler, SequenceConfig, SequenceObserver,
    SequenceRunResult, SequenceStatus, ShotPhase,
};
use chrono::Utc;
use ministudio_core::{CompiledRequest, GenerationResult, ShotError, ShotSpec, WorldState};
use ministudio_error::{
    CompilationErrorKind, GatewayError, GatewayErrorKind, SequenceError,
    SequenceErrorKind, StudioResult,
};
use ministudio_gateway::ProviderGateway;
use std::sync::Arc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Runs shot sequences against a shared provider gateway.
///
/// Each call to [`run_sequence`](Self::run_sequence) owns its world state,
/// continuity tracker and cancellation token, so independent sequences may run
/// concurrently on the same orchestrator. Shots within one sequence always run
/// one after another.
///
/// # Examples
///
/// ```
/// use ministudio_core::{Entity, ShotSpec, WorldState};
/// use ministudio_gateway::ProviderGateway;
/// use ministudio_providers::MockVideoProvider;
/// use ministudio_sequence::{FailurePolicy, SequenceOrchestrator};
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut gateway = ProviderGateway::new();
/// gateway.register(Arc::new(MockVideoProvider::new()), 0)?;
///
/// let orchestrator = SequenceOrchestrator::new(Arc::new(gateway));
/// let state = WorldState::new().with_entity("Orb", Entity::new().with_attribute("color", "gold"))?;
/// let shots = vec![ShotSpec::new("Orb enters", 5.0)];
///
/// let run = orchestrator.run_sequence(state, &shots, FailurePolicy::Halt).await?;
/// assert!(run.is_completed());
/// # Ok(())
/// # }
/// ```
pub struct SequenceOrchestrator {
    gateway: Arc<ProviderGateway>,
    compiler: PromptCompiler,
    config: SequenceConfig,
    observer: Option<Arc<dyn SequenceObserver>>,
}

impl SequenceOrchestrator {
    /// Create an orchestrator with default compiler and run settings.
    pub fn new(gateway: Arc<ProviderGateway>) -> Self {
        Self {
            gateway,
            compiler: PromptCompiler::default(),
            config: SequenceConfig::default(),
            observer: None,
        }
    }

    /// Builder method to set the prompt compiler.
    pub fn with_compiler(mut self, compiler: PromptCompiler) -> Self {
        self.compiler = compiler;
        self
    }

    /// Builder method to set run settings.
    pub fn with_config(mut self, config: SequenceConfig) -> Self {
        self.config = config;
        self
    }

    /// Builder method to attach a progress observer.
    pub fn with_observer(mut self, observer: Arc<dyn SequenceObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The gateway shots are dispatched to.
    pub fn gateway(&self) -> &Arc<ProviderGateway> {
        &self.gateway
    }

    /// The run settings in use.
    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    /// Run a sequence with the configured failure policy.
    ///
    /// # Errors
    ///
    /// See [`run_sequence`](Self::run_sequence).
    pub async fn run(
        &self,
        initial_state: WorldState,
        shots: &[ShotSpec],
    ) -> StudioResult<SequenceRunResult> {
        self.run_sequence(initial_state, shots, self.config.failure_policy)
            .await
    }

    /// Run every shot in order and report what happened.
    ///
    /// Shot failures never surface as errors; they are recorded on that
    /// shot's result and the run follows `policy`.
    ///
    /// # Errors
    ///
    /// Returns an error if `shots` is empty or the gateway has no providers.
    pub async fn run_sequence(
        &self,
        initial_state: WorldState,
        shots: &[ShotSpec],
        policy: FailurePolicy,
    ) -> StudioResult<SequenceRunResult> {
        self.run_sequence_with_cancellation(
            initial_state,
            shots,
            policy,
            CancellationToken::new(),
        )
        .await
    }

    /// Run every shot in order until done or `cancellation` fires.
    ///
    /// The token is checked before each shot starts. A shot already in
    /// flight is dispatched and recorded before the run ends as
    /// [`SequenceStatus::Aborted`]. The token belongs to this run only.
    ///
    /// # Errors
    ///
    /// Returns an error if `shots` is empty or the gateway has no providers.
    #[instrument(
        skip(self, initial_state, shots, cancellation),
        fields(run_id = tracing::field::Empty, shots = shots.len(), %policy)
    )]
    pub async fn run_sequence_with_cancellation(
        &self,
        initial_state: WorldState,
        shots: &[ShotSpec],
        policy: FailurePolicy,
        cancellation: CancellationToken,
    ) -> StudioResult<SequenceRunResult> {
        if shots.is_empty() {
            return Err(SequenceError::new(SequenceErrorKind::EmptyShotList).into());
        }
        if self.gateway.is_empty() {
            return Err(GatewayError::new(GatewayErrorKind::NoProviders).into());
        }

        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));
        let started_at = Utc::now();
        info!("Starting sequence run");

        let mut state = initial_state;
        let mut tracker = ContinuityTracker::new();
        let mut locked_seed = self.config.seed.filter(|_| self.config.lock_seed);
        let mut results = Vec::with_capacity(shots.len());
        let mut requests = Vec::with_capacity(shots.len());
        let mut state_history = Vec::with_capacity(shots.len());
        let mut status = SequenceStatus::Completed;

        for (index, shot) in shots.iter().enumerate() {
            if cancellation.is_cancelled() {
                warn!(shot = index, "Run cancelled before shot");
                status = SequenceStatus::Aborted;
                break;
            }

            self.notify_phase(index, ShotPhase::Pending);
            self.notify_phase(index, ShotPhase::Compiling);
            let shot_started = Instant::now();

            let compiled = match shot.state_delta() {
                Some(delta) => match state.apply_delta(delta) {
                    Ok(next) => {
                        let compiled = self.compile(index, &next, shot, &tracker, locked_seed);
                        // The delta sticks only if the shot compiled
                        if compiled.is_ok() {
                            state = next;
                        }
                        compiled
                    }
                    Err(e) => Err(ShotError::Compilation(
                        CompilationErrorKind::StateDelta(e.kind.to_string()).to_string(),
                    )),
                },
                None => self.compile(index, &state, shot, &tracker, locked_seed),
            };
            state_history.push(state.clone());

            let result = match compiled {
                Ok(request) => {
                    if request.is_continuity_degraded() {
                        warn!(
                            shot = index,
                            "No earlier output to continue from, dispatching without continuity"
                        );
                    }
                    self.notify_phase(index, ShotPhase::Dispatching);
                    let result = self.gateway.generate(&request).await;
                    requests.push(Some(request));
                    result
                }
                Err(reason) => {
                    warn!(shot = index, error = %reason, "Shot failed to compile");
                    requests.push(None);
                    GenerationResult::failure(index, reason, shot_started.elapsed())
                }
            };

            if tracker.record(&result) && self.config.lock_seed && locked_seed.is_none() {
                locked_seed = result.continuity().and_then(|p| *p.seed());
                debug!(seed = ?locked_seed, "Locked run seed");
            }

            let succeeded = result.is_success();
            match result.error() {
                Some(reason) => error!(shot = index, error = %reason, "Shot failed"),
                None => info!(
                    shot = index,
                    provider = result.provider_name().unwrap_or_default(),
                    elapsed_ms = result.duration_taken().as_millis() as u64,
                    "Shot recorded"
                ),
            }
            if let Some(observer) = &self.observer {
                observer.on_shot_recorded(&result);
            }
            results.push(result);
            self.notify_phase(index, ShotPhase::Recorded);

            if !succeeded && policy == FailurePolicy::Halt {
                warn!(shot = index, "Halting run after failed shot");
                status = SequenceStatus::Aborted;
                break;
            }
        }

        let run = SequenceRunResult {
            run_id,
            results,
            requests,
            state_history,
            final_state: state,
            final_status: status,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            status = %run.final_status,
            recorded = run.results.len(),
            succeeded = run.success_count(),
            "Sequence run finished"
        );
        if let Some(observer) = &self.observer {
            observer.on_run_finished(&run);
        }
        Ok(run)
    }

    fn compile(
        &self,
        index: usize,
        state: &WorldState,
        shot: &ShotSpec,
        tracker: &ContinuityTracker,
        seed: Option<u64>,
    ) -> Result<CompiledRequest, ShotError> {
        self.compiler
            .compile(index, state, shot, tracker.last(), seed)
            .map_err(|e| ShotError::Compilation(e.kind.to_string()))
    }

    fn notify_phase(&self, index: usize, phase: ShotPhase) {
        debug!(shot = index, %phase, "Shot phase");
        if let Some(observer) = &self.observer {
            observer.on_phase(index, phase);
        }
    }
}
