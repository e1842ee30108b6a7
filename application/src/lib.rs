//! Application layer for summit
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::DeliberationConfig;
pub use ports::{
    agent_gateway::{AgentGateway, FragmentObserver, GatewayError, StreamControl},
    cancellation_store::{CancellationSignalStore, CancellationStoreError},
    composite_publisher::CompositePublisher,
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    event_publisher::{EventPublisher, PublishError},
    progress::{DeliberationProgress, NoProgress},
};
pub use use_cases::cancel_round::{CancelRoundError, CancelRoundUseCase};
pub use use_cases::deliberate::{DeliberateError, DeliberateInput, DeliberateUseCase};
pub use use_cases::deliberate_streaming::{
    RoundOutcome, StreamingDeliberateUseCase, StreamingInput,
};
pub use use_cases::launch_round::{LaunchError, LaunchRequest, PreparedRound, RoundLauncher};
pub use use_cases::round_cancellation::RoundCancellation;
