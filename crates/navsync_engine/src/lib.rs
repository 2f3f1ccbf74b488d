//! Navsync engine: remote store, observable cache, panel coordination,
//! context menu sync, capture, enrichment and extension packaging.
mod background;
mod cache;
mod capture;
mod channel;
mod coordinator;
mod enrich;
mod extension;
mod generate;
mod host;
mod menu;
mod panel;
mod persist;
mod remote;
mod types;

pub use background::BackgroundService;
pub use cache::{CacheBackend, CacheChange, CacheError, FileBackend, LocalCache, MemoryBackend};
pub use capture::{CaptureClient, CaptureInvocation, CaptureOutcome};
pub use channel::{
    connect, ChannelError, ConnectionId, Port, PortMessage, PortSender, RuntimeBus,
    RuntimeMessage,
};
pub use coordinator::{Activation, PanelCoordinator};
pub use enrich::{run_enrichment, EnrichError, EnrichmentJob, EnrichmentReport, EnrichmentSink};
pub use extension::{
    build_bundle, manifest_json, BrowserVariant, BundleError, BundleFile, ExtensionBundle,
    ExtensionSettings, BACKGROUND_FILE, ICON_FILE, ICON_MISSING_FILE, MANIFEST_FILE,
    SIDEBAR_HTML_FILE, SIDEBAR_JS_FILE,
};
pub use generate::{
    description_prompt, AiConfig, AiProvider, DescriptionGenerator, HttpDescriptionGenerator,
    DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_URL, DEFAULT_OPENAI_MODEL, DEFAULT_OPENAI_URL,
};
pub use host::{HostError, HostPlatform, MenuHost, Notification, NotificationKind};
pub use menu::ContextMenuSynchronizer;
pub use panel::{spawn_panel, FetchOutcome, PanelDriver, PanelExit, PanelHandle, PendingFetch};
pub use persist::{ensure_dir, AtomicFileWriter, PersistError};
pub use remote::{
    LinkStore, RemoteSettings, ReqwestLinkStore, AUTH_HEADER, LINK_PATH, STORAGE_PATH,
};
pub use types::{FailureKind, RemoteError, WindowId};
