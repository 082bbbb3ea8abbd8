use async_trait::async_trait;
use tracing::debug;

/// What one capture attempt should try to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRequest {
    pub video: bool,
    pub audio: bool,
}

/// Opaque handle to live local media. The actual tracks are owned by the
/// platform layer; this crate only routes signaling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaHandle {
    pub id: String,
    pub has_video: bool,
    pub has_audio: bool,
}

/// Platform seam for local capture. Real implementations live outside this
/// crate; [`NullMedia`] stands in where no capture hardware exists.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Attempt one capture tier. `None` means denied or unavailable.
    async fn acquire(&self, request: CaptureRequest) -> Option<MediaHandle>;
}

/// Degrading acquisition ladder: camera plus mic, then mic only, then
/// nothing. Real-time video is a nice-to-have: this never fails, and a
/// `None` result must not keep a session from joining its room.
pub async fn init_local_capture(source: &dyn MediaSource) -> Option<MediaHandle> {
    let tiers = [
        CaptureRequest {
            video: true,
            audio: true,
        },
        CaptureRequest {
            video: false,
            audio: true,
        },
    ];
    for request in tiers {
        if let Some(handle) = source.acquire(request).await {
            return Some(handle);
        }
        debug!(?request, "capture tier unavailable, degrading");
    }
    None
}

/// No media at all; every acquisition attempt is declined.
pub struct NullMedia;

#[async_trait]
impl MediaSource for NullMedia {
    async fn acquire(&self, _request: CaptureRequest) -> Option<MediaHandle> {
        None
    }
}
