use std::time::Duration;

use async_trait::async_trait;

use screenwatch_core::model::Snapshot;
use screenwatch_core::source::{FetchError, SnapshotSource, snapshot_from_body};

const DEMO_BODY: &str = r#"{
  "error": false,
  "errorMsg": "",
  "data": { "data": {
    "data": [
      {
        "advert_playlist_id": 101,
        "playlist_name": "Breakfast rotation",
        "Adverts": [
          { "adverts_id": 1, "adverts_name": "Morning coffee", "adverts_refresh_time": 10,
            "adverts_file_name": "coffee.png", "adverts_file_name_unique": "9f1c-coffee.png",
            "adverts_start_time": "2023-10-02T06:00:00Z", "adverts_end_time": "2023-10-05T11:00:00Z",
            "timeings": [
              { "adverts_schedule_starthour": 6, "adverts_schedule_startmin": 0,
                "adverts_schedule_endhour": 11, "adverts_schedule_endmin": 0,
                "adverts_schedule_days": ["Mon", "Tue", "Wed", "Thu", "Fri"] }
            ] },
          { "adverts_id": 2, "adverts_name": "Fresh bagels", "adverts_refresh_time": 20,
            "adverts_file_name": "bagels.png", "adverts_file_name_unique": "77aa-bagels.png" }
        ]
      },
      {
        "advert_playlist_id": 102,
        "playlist_name": "Evening specials",
        "Adverts": [
          { "adverts_id": 3, "adverts_name": "Happy hour", "adverts_refresh_time": 15,
            "adverts_start_time": "2023-10-01T16:00:00Z", "adverts_end_time": "2023-10-08T20:00:00Z",
            "timeings": [
              { "adverts_schedule_starthour": 16, "adverts_schedule_startmin": 30,
                "adverts_schedule_endhour": 19, "adverts_schedule_endmin": 5,
                "adverts_schedule_days": ["Fri", "Sat"] }
            ] }
        ]
      },
      { "adverts_id": 4, "adverts_name": "Weekend sale", "adverts_refresh_time": 5,
        "adverts_file_name": "sale.png", "adverts_file_name_unique": "c3d4-sale.png",
        "adverts_start_time": "2023-10-06 00:00:00", "adverts_end_time": "2023-10-08 23:59:00" },
      { "adverts_id": 5, "adverts_name": "Store hours", "adverts_refresh_time": 2 }
    ],
    "screen": {
      "user_screens_user_id": 4021,
      "user_screens_mediaplayer_id": 88,
      "screen_height": 1080,
      "screen_width": 1920,
      "user_screens_last_publish": "2023-09-30T14:22:00Z"
    },
    "profile": { "mute_audio": 0, "audio_volume": 65 }
  } }
}"#;

/// Built-in sample screen for running without a player
pub struct DemoSource {
    latency: Duration,
}

impl DemoSource {
    pub fn new() -> Self {
        Self {
            latency: Duration::from_millis(300),
        }
    }

    #[cfg(test)]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotSource for DemoSource {
    async fn fetch(&self) -> Result<Snapshot, FetchError> {
        tokio::time::sleep(self.latency).await;
        snapshot_from_body(DEMO_BODY.as_bytes())
    }

    fn name(&self) -> String {
        "demo".into()
    }
}
