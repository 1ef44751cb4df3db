// CCTV endpoints and stream/snapshot URL construction.
//
// Cameras come back from `api/v1/cctv` with a per-camera stream token
// (`token_l`) already minted by the server; the RTSP and screenshot URLs
// embed that token in the query string instead of using the bearer
// header. Entries missing the stream essentials are dropped.

use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::client::UfanetClient;
use crate::error::Error;
use crate::token::{is_expiring, jwt_expiry};

/// A camera visible to a contract, with its stream token resolved.
#[derive(Debug, Clone, Serialize)]
pub struct Camera {
    pub number: String,
    pub title: Option<String>,
    pub address: Option<String>,
    /// Streaming server host for the RTSP source.
    pub domain: String,
    /// Camera-scoped stream token (a JWT), used in URL queries.
    pub token_l: String,
    /// Screenshot server host, if stills are available.
    pub screenshot_domain: Option<String>,
}

impl Camera {
    /// Display name: title, then address, then the camera number.
    pub fn display_name(&self) -> &str {
        self.title
            .as_deref()
            .or(self.address.as_deref())
            .unwrap_or(&self.number)
    }

    /// RTSP stream source with the embedded stream token.
    pub fn stream_url(&self) -> String {
        format!("rtsp://{}/{}?token={}", self.domain, self.number, self.token_l)
    }

    /// Still-image URL, if the camera has a screenshot server.
    pub fn snapshot_url(&self) -> Option<String> {
        self.screenshot_domain.as_ref().map(|domain| {
            format!(
                "https://{domain}/api/v0/screenshots/{}~600.jpg?token={}",
                self.number, self.token_l
            )
        })
    }

    /// True if the embedded stream token is close to expiring. Unknown
    /// expiry counts as expiring.
    pub fn token_expiring(&self) -> bool {
        is_expiring(jwt_expiry(&self.token_l), Utc::now())
    }
}

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawCamera {
    number: Option<String>,
    title: Option<String>,
    address: Option<String>,
    token_l: Option<String>,
    #[serde(default)]
    servers: RawServers,
}

#[derive(Default, Deserialize)]
struct RawServers {
    domain: Option<String>,
    screenshot_domain: Option<String>,
}

impl RawCamera {
    /// Entries without a stream domain, number, or token can't produce a
    /// playable URL; drop them.
    fn into_camera(self) -> Option<Camera> {
        Some(Camera {
            number: self.number?,
            domain: self.servers.domain?,
            token_l: self.token_l?,
            title: self.title,
            address: self.address,
            screenshot_domain: self.servers.screenshot_domain,
        })
    }
}

impl UfanetClient {
    /// List cameras with prepared stream info.
    pub async fn list_cameras(&self) -> Result<Vec<Camera>, Error> {
        let raw: Vec<RawCamera> = self.get_json("api/v1/cctv").await?;
        let total = raw.len();
        let cameras: Vec<Camera> = raw.into_iter().filter_map(RawCamera::into_camera).collect();
        if cameras.len() < total {
            warn!(
                "skipped {} camera entries without stream info",
                total - cameras.len()
            );
        }
        debug!("fetched {} cameras", cameras.len());
        Ok(cameras)
    }

    /// Fetch a still image for a camera.
    ///
    /// The screenshot endpoint authenticates with the camera-scoped
    /// `token_l` in the query string, not the bearer header. When that
    /// token is expiring, the camera record is refreshed once through
    /// [`Self::list_cameras`] before fetching.
    pub async fn fetch_snapshot(&self, camera: &Camera) -> Result<Bytes, Error> {
        if camera.screenshot_domain.is_none() {
            return Err(Error::SnapshotUnavailable {
                number: camera.number.clone(),
            });
        }

        let camera = if camera.token_expiring() {
            self.refreshed_camera(camera).await?
        } else {
            camera.clone()
        };

        let url: Url = camera
            .snapshot_url()
            .ok_or(Error::SnapshotUnavailable {
                number: camera.number.clone(),
            })?
            .parse()?;

        debug!("fetching snapshot for camera {}", camera.number);
        let resp = self.http().get(url).send().await.map_err(Error::Transport)?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }
        resp.bytes().await.map_err(Error::Transport)
    }

    /// Re-list cameras and return the record matching `camera.number`.
    /// Falls back to the stale record if the camera disappeared.
    async fn refreshed_camera(&self, camera: &Camera) -> Result<Camera, Error> {
        let cameras = self.list_cameras().await?;
        match cameras.into_iter().find(|c| c.number == camera.number) {
            Some(fresh) => Ok(fresh),
            None => {
                warn!(
                    "camera {} not found in refreshed list, keeping cached record",
                    camera.number
                );
                Ok(camera.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera {
            number: "1383990125".into(),
            title: Some("Подъезд 2".into()),
            address: None,
            domain: "s3.ufanet.ru".into(),
            token_l: "tok".into(),
            screenshot_domain: Some("screenshot.ufanet.ru".into()),
        }
    }

    #[test]
    fn stream_url_embeds_token() {
        assert_eq!(
            camera().stream_url(),
            "rtsp://s3.ufanet.ru/1383990125?token=tok"
        );
    }

    #[test]
    fn snapshot_url_uses_screenshot_domain() {
        assert_eq!(
            camera().snapshot_url().as_deref(),
            Some("https://screenshot.ufanet.ru/api/v0/screenshots/1383990125~600.jpg?token=tok")
        );

        let mut cam = camera();
        cam.screenshot_domain = None;
        assert!(cam.snapshot_url().is_none());
    }

    #[test]
    fn display_name_prefers_title() {
        let mut cam = camera();
        assert_eq!(cam.display_name(), "Подъезд 2");
        cam.title = None;
        assert_eq!(cam.display_name(), "1383990125");
    }

    #[test]
    fn opaque_stream_token_counts_as_expiring() {
        assert!(camera().token_expiring());
    }
}
