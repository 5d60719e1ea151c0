use std::fmt::{Display, Formatter};

/// Identifies which worker binary is handing an error off to the crash
/// reporter. Mirrors the `toolId` argument the reporter expects on its
/// command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolId {
    MainDownloader,
    GoFileHelper,
    GameHandler,
    NotificationHelper,
    TopLevel,
}

impl ToolId {
    pub fn as_str(self) -> &'static str {
        match self {
            ToolId::MainDownloader => "maindownloader",
            ToolId::GoFileHelper => "gofilehelper",
            ToolId::GameHandler => "gamehandler",
            ToolId::NotificationHelper => "notificationhelper",
            ToolId::TopLevel => "toplevel",
        }
    }
}

impl Display for ToolId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The numeric error taxonomy from the worker error-code ranges:
/// 1000-1004 generic, 1100-1199 game handler, 1200-1299 host helper,
/// 1300-1399 direct downloader. Each worker only ever emits codes from
/// its own range.
#[derive(Debug, Clone)]
pub enum WorkerError {
    // Generic (1000-1004), shared by every worker.
    Unknown(String),
    Unhandled(String),
    Network(String),
    InvalidData(String),

    // Game handler (1100-1199)
    MissingExecutable(String),
    LaunchFailure(String),
    ProcessManageFailure(String),
    SettingsReadError(String),
    MissingDownloadDirectory(String),

    // Host helper (1200-1299)
    HostApiError(String),
    HostTransferError(String),
    HostAuthError(String),
    HostRateLimited(String),
    HostFileProcessingError(String),

    // Direct downloader (1300-1399)
    DownloaderInitError(String),
    DownloaderProgressError(String),
    DownloaderCancelled(String),
    DownloaderVerifyError(String),
    DownloaderExtractError(String),
    DownloaderCleanupError(String),
    DownloaderSettingsIoError(String),
    DownloaderHelperSpawnError(String),
}

impl WorkerError {
    pub fn code(&self) -> u32 {
        match self {
            WorkerError::Unknown(_) => 1000,
            WorkerError::Unhandled(_) => 1001,
            WorkerError::Network(_) => 1002,
            WorkerError::InvalidData(_) => 1003,

            WorkerError::MissingExecutable(_) => 1100,
            WorkerError::LaunchFailure(_) => 1101,
            WorkerError::ProcessManageFailure(_) => 1102,
            WorkerError::SettingsReadError(_) => 1103,
            WorkerError::MissingDownloadDirectory(_) => 1104,

            WorkerError::HostApiError(_) => 1200,
            WorkerError::HostTransferError(_) => 1201,
            WorkerError::HostAuthError(_) => 1202,
            WorkerError::HostRateLimited(_) => 1203,
            WorkerError::HostFileProcessingError(_) => 1204,

            WorkerError::DownloaderInitError(_) => 1300,
            WorkerError::DownloaderProgressError(_) => 1301,
            WorkerError::DownloaderCancelled(_) => 1302,
            WorkerError::DownloaderVerifyError(_) => 1303,
            WorkerError::DownloaderExtractError(_) => 1304,
            WorkerError::DownloaderCleanupError(_) => 1305,
            WorkerError::DownloaderSettingsIoError(_) => 1306,
            WorkerError::DownloaderHelperSpawnError(_) => 1307,
        }
    }

    pub fn tool_id(&self) -> ToolId {
        match self {
            WorkerError::Unknown(_)
            | WorkerError::Unhandled(_)
            | WorkerError::Network(_)
            | WorkerError::InvalidData(_) => ToolId::TopLevel,

            WorkerError::MissingExecutable(_)
            | WorkerError::LaunchFailure(_)
            | WorkerError::ProcessManageFailure(_)
            | WorkerError::SettingsReadError(_)
            | WorkerError::MissingDownloadDirectory(_) => ToolId::GameHandler,

            WorkerError::HostApiError(_)
            | WorkerError::HostTransferError(_)
            | WorkerError::HostAuthError(_)
            | WorkerError::HostRateLimited(_)
            | WorkerError::HostFileProcessingError(_) => ToolId::GoFileHelper,

            WorkerError::DownloaderInitError(_)
            | WorkerError::DownloaderProgressError(_)
            | WorkerError::DownloaderCancelled(_)
            | WorkerError::DownloaderVerifyError(_)
            | WorkerError::DownloaderExtractError(_)
            | WorkerError::DownloaderCleanupError(_)
            | WorkerError::DownloaderSettingsIoError(_)
            | WorkerError::DownloaderHelperSpawnError(_) => ToolId::MainDownloader,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            WorkerError::Unknown(m)
            | WorkerError::Unhandled(m)
            | WorkerError::Network(m)
            | WorkerError::InvalidData(m)
            | WorkerError::MissingExecutable(m)
            | WorkerError::LaunchFailure(m)
            | WorkerError::ProcessManageFailure(m)
            | WorkerError::SettingsReadError(m)
            | WorkerError::MissingDownloadDirectory(m)
            | WorkerError::HostApiError(m)
            | WorkerError::HostTransferError(m)
            | WorkerError::HostAuthError(m)
            | WorkerError::HostRateLimited(m)
            | WorkerError::HostFileProcessingError(m)
            | WorkerError::DownloaderInitError(m)
            | WorkerError::DownloaderProgressError(m)
            | WorkerError::DownloaderCancelled(m)
            | WorkerError::DownloaderVerifyError(m)
            | WorkerError::DownloaderExtractError(m)
            | WorkerError::DownloaderCleanupError(m)
            | WorkerError::DownloaderSettingsIoError(m)
            | WorkerError::DownloaderHelperSpawnError(m) => m,
        }
    }
}

impl Display for WorkerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

impl std::error::Error for WorkerError {}
