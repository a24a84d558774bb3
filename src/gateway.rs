//! Remote data gateway for the Steam Web API
//!
//! One generic authenticated `call` plus five typed operations on top of
//! it, each with its own failure mapping: identity and ownership lookups
//! propagate `RemoteServiceError`, achievement lookups degrade to `None`
//! because they are expected to fail for a large fraction of titles
//! (no achievement system, private profile data).
//!
//! The gateway is pure request/response — no retry, no cache. Response
//! shaping lives in standalone parse functions over `serde_json::Value`
//! so it can be tested without a network.

use crate::config::GatewayConfig;
use crate::error::RemoteServiceError;
use crate::types::{AchievementSchema, AchievementUnlockState, TitleRecord};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// User agent sent with every gateway request
pub const USER_AGENT: &str = concat!("playlens/", env!("CARGO_PKG_VERSION"));

/// Source of per-player statistics. The aggregation engine depends on
/// this seam rather than on `SteamGateway` directly, so tests can drive
/// it with a scripted stub.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// Display name of the player. Fails when the response contains no
    /// player entry.
    async fn player_name(&self, player_id: &str) -> Result<String, RemoteServiceError>;

    /// Platform level of the player.
    async fn player_level(&self, player_id: &str) -> Result<u32, RemoteServiceError>;

    /// Every title the player owns. An account with no recorded titles
    /// yields an empty vector, not a failure.
    async fn owned_titles(&self, player_id: &str) -> Result<Vec<TitleRecord>, RemoteServiceError>;

    /// Achievement catalog for a title. Any failure maps to `None`.
    async fn achievement_schema(
        &self,
        app_id: u64,
    ) -> Result<Option<AchievementSchema>, RemoteServiceError>;

    /// The player's unlock state for a title. Any failure, or an empty
    /// achievement list, maps to `None`.
    async fn player_unlocks(
        &self,
        app_id: u64,
        player_id: &str,
    ) -> Result<Option<AchievementUnlockState>, RemoteServiceError>;
}

/// HTTP gateway against the Steam Web API.
pub struct SteamGateway {
    config: GatewayConfig,
    http: reqwest::Client,
}

impl SteamGateway {
    /// Build a gateway with its own HTTP client, timeout, and user agent.
    pub fn new(config: GatewayConfig) -> Result<Self, RemoteServiceError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RemoteServiceError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    /// Issue one authenticated GET against
    /// `{base}/{interface}/{method}/{version}/` and decode the JSON body.
    ///
    /// Fails on transport errors, non-success statuses, and undecodable
    /// bodies. The URL embedded in errors omits the credential.
    pub async fn call(
        &self,
        interface: &str,
        method: &str,
        version: &str,
        params: &[(&str, String)],
    ) -> Result<Value, RemoteServiceError> {
        let endpoint = format!(
            "{}/{}/{}/{}/",
            self.config.base_url, interface, method, version
        );
        let display_url = display_url(&endpoint, params);

        debug!(interface, method, "steam api call");

        let mut query: Vec<(&str, String)> = Vec::with_capacity(params.len() + 1);
        query.push(("key", self.config.api_key.clone()));
        query.extend(params.iter().cloned());

        let response = self
            .http
            .get(&endpoint)
            .query(&query)
            .send()
            .await
            .map_err(|source| RemoteServiceError::Transport {
                url: display_url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteServiceError::Status {
                url: display_url,
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| RemoteServiceError::Decode {
                url: display_url,
                detail: e.to_string(),
            })
    }

    fn decode_error(&self, interface: &str, method: &str, version: &str, detail: String) -> RemoteServiceError {
        RemoteServiceError::Decode {
            url: format!(
                "{}/{}/{}/{}/",
                self.config.base_url, interface, method, version
            ),
            detail,
        }
    }
}

#[async_trait]
impl StatsProvider for SteamGateway {
    async fn player_name(&self, player_id: &str) -> Result<String, RemoteServiceError> {
        let data = self
            .call(
                "ISteamUser",
                "GetPlayerSummaries",
                "v2",
                &[("steamids", player_id.to_string())],
            )
            .await?;

        parse_player_name(&data)
            .map_err(|detail| self.decode_error("ISteamUser", "GetPlayerSummaries", "v2", detail))
    }

    async fn player_level(&self, player_id: &str) -> Result<u32, RemoteServiceError> {
        let data = self
            .call(
                "IPlayerService",
                "GetSteamLevel",
                "v1",
                &[("steamid", player_id.to_string())],
            )
            .await?;

        parse_player_level(&data)
            .map_err(|detail| self.decode_error("IPlayerService", "GetSteamLevel", "v1", detail))
    }

    async fn owned_titles(&self, player_id: &str) -> Result<Vec<TitleRecord>, RemoteServiceError> {
        let data = self
            .call(
                "IPlayerService",
                "GetOwnedGames",
                "v1",
                &[
                    ("steamid", player_id.to_string()),
                    ("include_appinfo", "true".to_string()),
                    ("include_played_free_games", "true".to_string()),
                ],
            )
            .await?;

        parse_owned_titles(&data)
            .map_err(|detail| self.decode_error("IPlayerService", "GetOwnedGames", "v1", detail))
    }

    async fn achievement_schema(
        &self,
        app_id: u64,
    ) -> Result<Option<AchievementSchema>, RemoteServiceError> {
        match self
            .call(
                "ISteamUserStats",
                "GetSchemaForGame",
                "v2",
                &[("appid", app_id.to_string())],
            )
            .await
        {
            Ok(data) => Ok(parse_achievement_schema(app_id, &data)),
            Err(e) => {
                debug!(app_id, error = %e, "schema lookup failed, treating as absent");
                Ok(None)
            }
        }
    }

    async fn player_unlocks(
        &self,
        app_id: u64,
        player_id: &str,
    ) -> Result<Option<AchievementUnlockState>, RemoteServiceError> {
        match self
            .call(
                "ISteamUserStats",
                "GetPlayerAchievements",
                "v1",
                &[
                    ("appid", app_id.to_string()),
                    ("steamid", player_id.to_string()),
                ],
            )
            .await
        {
            Ok(data) => Ok(parse_player_unlocks(&data)),
            Err(e) => {
                debug!(app_id, error = %e, "unlock lookup failed, treating as absent");
                Ok(None)
            }
        }
    }
}

/// URL shown in errors and traces: endpoint plus query, credential omitted.
fn display_url(endpoint: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return endpoint.to_string();
    }
    let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{}?{}", endpoint, query.join("&"))
}

/// Extract the first player's display name from a `GetPlayerSummaries`
/// response. A response without a player entry is a decode failure.
pub fn parse_player_name(data: &Value) -> Result<String, String> {
    data["response"]["players"]
        .get(0)
        .and_then(|player| player["personaname"].as_str())
        .map(str::to_string)
        .ok_or_else(|| "no player entry in response".to_string())
}

/// Extract the player level from a `GetSteamLevel` response.
pub fn parse_player_level(data: &Value) -> Result<u32, String> {
    data["response"]["player_level"]
        .as_u64()
        .map(|level| level as u32)
        .ok_or_else(|| "missing player_level in response".to_string())
}

/// Extract owned titles from a `GetOwnedGames` response. A response
/// without a `games` list (account with no recorded titles) is an empty
/// vector; a response without the `response` envelope is a decode failure.
pub fn parse_owned_titles(data: &Value) -> Result<Vec<TitleRecord>, String> {
    let envelope = data
        .get("response")
        .ok_or_else(|| "missing response envelope".to_string())?;

    let games = match envelope.get("games").and_then(Value::as_array) {
        Some(games) => games,
        None => return Ok(Vec::new()),
    };

    let titles = games
        .iter()
        .filter_map(|game| {
            let app_id = game["appid"].as_u64()?;
            let name = game["name"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| format!("App {app_id}"));
            Some(TitleRecord {
                app_id,
                name,
                playtime_minutes: game["playtime_forever"].as_u64().unwrap_or(0),
            })
        })
        .collect();

    Ok(titles)
}

/// Extract an achievement catalog from a `GetSchemaForGame` response.
/// Missing or empty catalogs are absent, not errors.
pub fn parse_achievement_schema(app_id: u64, data: &Value) -> Option<AchievementSchema> {
    let achievements = data["game"]["availableGameStats"]["achievements"].as_array()?;
    if achievements.is_empty() {
        return None;
    }

    let definitions: Vec<String> = achievements
        .iter()
        .filter_map(|entry| entry["name"].as_str().map(str::to_string))
        .collect();

    if definitions.is_empty() {
        return None;
    }

    Some(AchievementSchema {
        app_id,
        definitions,
    })
}

/// Extract a player's unlock state from a `GetPlayerAchievements`
/// response. Missing or empty achievement lists are absent.
pub fn parse_player_unlocks(data: &Value) -> Option<AchievementUnlockState> {
    let achievements = data["playerstats"]["achievements"].as_array()?;
    if achievements.is_empty() {
        return None;
    }

    let unlocks: AchievementUnlockState = achievements
        .iter()
        .filter_map(|entry| {
            let key = entry["apiname"].as_str()?.to_string();
            let achieved = entry["achieved"].as_u64().unwrap_or(0) != 0;
            Some((key, achieved))
        })
        .collect();

    if unlocks.is_empty() {
        return None;
    }

    Some(unlocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_player_name() {
        let data = json!({
            "response": { "players": [ { "personaname": "gordon", "steamid": "765611" } ] }
        });
        assert_eq!(parse_player_name(&data).unwrap(), "gordon");
    }

    #[test]
    fn test_parse_player_name_missing_entry() {
        let data = json!({ "response": { "players": [] } });
        assert!(parse_player_name(&data).is_err());
    }

    #[test]
    fn test_parse_player_level() {
        let data = json!({ "response": { "player_level": 42 } });
        assert_eq!(parse_player_level(&data).unwrap(), 42);
    }

    #[test]
    fn test_parse_owned_titles() {
        let data = json!({
            "response": {
                "game_count": 2,
                "games": [
                    { "appid": 620, "name": "Portal 2", "playtime_forever": 1234 },
                    { "appid": 70, "playtime_forever": 0 }
                ]
            }
        });

        let titles = parse_owned_titles(&data).unwrap();
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[0].name, "Portal 2");
        assert_eq!(titles[0].playtime_minutes, 1234);
        // Name falls back to the app id when the service omits it
        assert_eq!(titles[1].name, "App 70");
    }

    #[test]
    fn test_parse_owned_titles_empty_library() {
        let data = json!({ "response": {} });
        assert_eq!(parse_owned_titles(&data).unwrap(), Vec::new());
    }

    #[test]
    fn test_parse_owned_titles_missing_envelope() {
        let data = json!({});
        assert!(parse_owned_titles(&data).is_err());
    }

    #[test]
    fn test_parse_achievement_schema() {
        let data = json!({
            "game": {
                "gameName": "Portal 2",
                "availableGameStats": {
                    "achievements": [
                        { "name": "ACH_SURVIVE_CONTAINER_RIDE", "displayName": "Wake Up Call" },
                        { "name": "ACH_TAUNT_CAMERA", "displayName": "Lunacy" }
                    ]
                }
            }
        });

        let schema = parse_achievement_schema(620, &data).unwrap();
        assert_eq!(schema.app_id, 620);
        assert_eq!(
            schema.definitions,
            vec!["ACH_SURVIVE_CONTAINER_RIDE", "ACH_TAUNT_CAMERA"]
        );
    }

    #[test]
    fn test_parse_achievement_schema_absent_cases() {
        // Title without an achievement system
        let no_stats = json!({ "game": {} });
        assert!(parse_achievement_schema(1, &no_stats).is_none());

        // Empty catalog counts as absent
        let empty = json!({ "game": { "availableGameStats": { "achievements": [] } } });
        assert!(parse_achievement_schema(1, &empty).is_none());
    }

    #[test]
    fn test_parse_player_unlocks() {
        let data = json!({
            "playerstats": {
                "achievements": [
                    { "apiname": "ACH_A", "achieved": 1 },
                    { "apiname": "ACH_B", "achieved": 0 }
                ]
            }
        });

        let unlocks = parse_player_unlocks(&data).unwrap();
        assert_eq!(unlocks.len(), 2);
        assert_eq!(unlocks["ACH_A"], true);
        assert_eq!(unlocks["ACH_B"], false);
    }

    #[test]
    fn test_parse_player_unlocks_empty_is_absent() {
        let data = json!({ "playerstats": { "achievements": [] } });
        assert!(parse_player_unlocks(&data).is_none());

        let missing = json!({ "playerstats": {} });
        assert!(parse_player_unlocks(&missing).is_none());
    }

    #[test]
    fn test_display_url_omits_credential() {
        let url = display_url(
            "https://api.steampowered.com/IPlayerService/GetSteamLevel/v1/",
            &[("steamid", "765611".to_string())],
        );
        assert_eq!(
            url,
            "https://api.steampowered.com/IPlayerService/GetSteamLevel/v1/?steamid=765611"
        );
        assert!(!url.contains("key="));
    }
}
