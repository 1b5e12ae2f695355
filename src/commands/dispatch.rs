use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Command;
use crate::error::AppResult;
use crate::map::MarkerColor;
use crate::store::{self, AddCityOutcome};
use crate::AppState;

/// A chat message forwarded by the platform adapter
#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub user_id: i64,
    pub user_name: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    /// Base64-encoded file contents
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct CommandReply {
    pub content: String,
    pub attachment: Option<Attachment>,
}

impl CommandReply {
    fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            attachment: None,
        }
    }

    fn with_image(content: impl Into<String>, filename: &str, png: &[u8]) -> Self {
        Self {
            content: content.into(),
            attachment: Some(Attachment {
                filename: filename.to_string(),
                content_type: "image/png".to_string(),
                data: general_purpose::STANDARD.encode(png),
            }),
        }
    }
}

/// Run the command in `message`, if it holds one
pub async fn dispatch(state: &AppState, message: &IncomingMessage) -> AppResult<Option<CommandReply>> {
    let prefix = state.config.command_prefix.as_str();
    let Some(command) = Command::parse(prefix, &message.content) else {
        return Ok(None);
    };

    tracing::debug!(user_id = message.user_id, command = ?command, "Dispatching command");

    let reply = match command {
        Command::Start => CommandReply::text(format!(
            "Hello, {}. Enter {}help_me to explore the list of available commands",
            message.user_name, prefix
        )),
        Command::Help => CommandReply::text(help_text(prefix)),
        Command::ShowCity { city, color } => show_city(state, message.user_id, &city, color).await?,
        Command::ShowMyCities { color } => show_my_cities(state, message.user_id, color).await?,
        Command::RememberCity { city } => remember_city(state, message.user_id, &city).await?,
        Command::Distance { cities } => distance(state, cities).await?,
        Command::Unknown(name) => CommandReply::text(format!(
            "Unknown command `{p}{name}`. Enter `{p}help_me` to see the available commands.",
            p = prefix
        )),
    };

    Ok(Some(reply))
}

fn help_text(p: &str) -> String {
    format!(
        "**City Map Bot commands**\n\n\
         `{p}start` - Greets you and shows the first steps.\n\
         `{p}help_me` - Shows this list of commands.\n\
         `{p}show_city <city_name>[|color]` - Shows a map with the given city.\n\
         `{p}remember_city <city_name>` - Saves a city to your favorites.\n\
         `{p}show_my_cities [color]` - Shows a map of every city you have saved.\n\
         `{p}distance <city1>, <city2>` - Shows the distance between two cities.\n\n\
         _Examples:_\n\
         `{p}show_city London`\n\
         `{p}show_city Tokyo|#1f77b4`\n\
         `{p}remember_city Jakarta`\n\
         `{p}show_my_cities green`\n\
         `{p}distance London, Jakarta`"
    )
}

fn parse_color(token: Option<String>) -> Result<MarkerColor, CommandReply> {
    match token {
        None => Ok(MarkerColor::default()),
        Some(token) => token.parse().map_err(|_| {
            CommandReply::text(format!(
                "**{}** is not a recognized color. Use a color name such as `blue` or a hex code such as `#ff8800`.",
                token
            ))
        }),
    }
}

async fn show_city(
    state: &AppState,
    user_id: i64,
    city: &str,
    color: Option<String>,
) -> AppResult<CommandReply> {
    let p = &state.config.command_prefix;
    if city.is_empty() {
        return Ok(CommandReply::text(format!(
            "Please write a city name after the command, for example: `{p}show_city London`"
        )));
    }

    let color = match parse_color(color) {
        Ok(color) => color,
        Err(reply) => return Ok(reply),
    };

    if store::get_coordinates(&state.db, city).await?.is_none() {
        return Ok(CommandReply::text(format!(
            "City **{}** was not found in the database. Make sure it is spelled in English and is in the city catalog.",
            city
        )));
    }

    let path = state
        .renderer
        .maps_dir()
        .join(format!("map_{}_{}.png", user_id, Uuid::new_v4()));
    let drawn = state
        .renderer
        .create_graph(&state.db, &path, &[city.to_string()], &color)
        .await?;

    if !drawn {
        return Ok(CommandReply::text(
            "There was a problem drawing the map. Please try again later.",
        ));
    }

    let png = take_file(&path).await?;
    Ok(CommandReply::with_image(
        format!("Here is the map for **{}**:", city),
        "city_map.png",
        &png,
    ))
}

async fn show_my_cities(
    state: &AppState,
    user_id: i64,
    color: Option<String>,
) -> AppResult<CommandReply> {
    let p = &state.config.command_prefix;
    let color = match parse_color(color) {
        Ok(color) => color,
        Err(reply) => return Ok(reply),
    };

    let cities = store::select_cities(&state.db, user_id).await?;
    if cities.is_empty() {
        return Ok(CommandReply::text(format!(
            "You have not saved any cities yet.\n\
             Use `{p}remember_city <city_name>` to save a city first."
        )));
    }

    let path = state
        .renderer
        .maps_dir()
        .join(format!("map_user_{}_{}.png", user_id, Uuid::new_v4()));
    let drawn = state
        .renderer
        .create_graph(&state.db, &path, &cities, &color)
        .await?;

    if !drawn {
        return Ok(CommandReply::text(
            "None of your saved cities have valid coordinates to draw. Try saving another city.",
        ));
    }

    let png = take_file(&path).await?;
    Ok(CommandReply::with_image(
        format!("Here is a map of your saved cities: **{}**", cities.join(", ")),
        "my_cities_map.png",
        &png,
    ))
}

async fn remember_city(state: &AppState, user_id: i64, city: &str) -> AppResult<CommandReply> {
    let p = &state.config.command_prefix;
    if city.is_empty() {
        return Ok(CommandReply::text(format!(
            "Please write a city name after the command, for example: `{p}remember_city Jakarta`"
        )));
    }

    let reply = match store::add_city(&state.db, user_id, city).await? {
        AddCityOutcome::Added => format!("City {} has been saved!", city),
        AddCityOutcome::AlreadySaved => format!("City {} is already in your list.", city),
        AddCityOutcome::CityNotFound => format!(
            "City {} was not found. Please enter the city name in English, with a space after the command.",
            city
        ),
    };

    Ok(CommandReply::text(reply))
}

async fn distance(state: &AppState, cities: Option<(String, String)>) -> AppResult<CommandReply> {
    let p = &state.config.command_prefix;
    let Some((city1, city2)) = cities else {
        return Ok(CommandReply::text(format!(
            "Please write two city names separated by a comma, for example: `{p}distance London, Jakarta`"
        )));
    };

    let Some(map) = state.renderer.draw_distance(&state.db, &city1, &city2).await? else {
        return Ok(CommandReply::text(format!(
            "Could not find both **{}** and **{}** in the database.",
            city1, city2
        )));
    };

    Ok(CommandReply::with_image(
        format!(
            "Distance between **{}** and **{}**: {:.1} km",
            city1, city2, map.distance_km
        ),
        "distance_map.png",
        &map.png,
    ))
}

/// Read a per-request map back and remove it
async fn take_file(path: &Path) -> AppResult<Vec<u8>> {
    let bytes = tokio::fs::read(path).await?;
    tokio::fs::remove_file(path).await?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_state;

    fn message(content: &str) -> IncomingMessage {
        IncomingMessage {
            user_id: 1001,
            user_name: "ayu".to_string(),
            content: content.to_string(),
        }
    }

    async fn run(state: &AppState, content: &str) -> CommandReply {
        dispatch(state, &message(content))
            .await
            .unwrap()
            .expect("text is a command")
    }

    fn decoded(reply: &CommandReply) -> Vec<u8> {
        let attachment = reply.attachment.as_ref().expect("reply has an image");
        assert_eq!(attachment.content_type, "image/png");
        general_purpose::STANDARD.decode(&attachment.data).unwrap()
    }

    #[tokio::test]
    async fn test_plain_text_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        assert!(dispatch(&state, &message("just chatting")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_start_and_help() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        let reply = run(&state, "!start").await;
        assert!(reply.content.contains("Hello, ayu."));
        assert!(reply.content.contains("!help_me"));

        let reply = run(&state, "!help_me").await;
        assert!(reply.content.contains("!show_city"));
        assert!(reply.content.contains("!distance"));
        assert!(reply.attachment.is_none());

        let reply = run(&state, "!fly").await;
        assert!(reply.content.starts_with("Unknown command `!fly`"));
    }

    #[tokio::test]
    async fn test_show_city() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        let reply = run(&state, "!show_city London|navy").await;
        assert_eq!(reply.content, "Here is the map for **London**:");
        assert_eq!(reply.attachment.as_ref().unwrap().filename, "city_map.png");
        assert!(decoded(&reply).starts_with(b"\x89PNG"));
        // Per-request files are cleaned up after being attached
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_show_city_rejections() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        let reply = run(&state, "!show_city").await;
        assert!(reply.content.starts_with("Please write a city name"));

        let reply = run(&state, "!show_city London|sparkly").await;
        assert!(reply.content.contains("**sparkly** is not a recognized color"));
        assert!(reply.attachment.is_none());

        let reply = run(&state, "!show_city Atlantis").await;
        assert!(reply.content.contains("**Atlantis** was not found"));
        assert!(reply.attachment.is_none());
    }

    #[tokio::test]
    async fn test_remember_and_show_my_cities() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        let reply = run(&state, "!show_my_cities").await;
        assert!(reply.content.starts_with("You have not saved any cities yet."));

        assert_eq!(run(&state, "!remember_city Jakarta").await.content, "City Jakarta has been saved!");
        assert_eq!(run(&state, "!remember_city London").await.content, "City London has been saved!");
        assert_eq!(
            run(&state, "!remember_city London").await.content,
            "City London is already in your list."
        );
        assert!(run(&state, "!remember_city Atlantis").await.content.contains("was not found"));

        let reply = run(&state, "!show_my_cities #336699").await;
        assert!(reply.content.contains("Jakarta"));
        assert!(reply.content.contains("London"));
        assert_eq!(reply.attachment.as_ref().unwrap().filename, "my_cities_map.png");
        assert!(decoded(&reply).starts_with(b"\x89PNG"));

        let reply = run(&state, "!show_my_cities plaid").await;
        assert!(reply.content.contains("not a recognized color"));
    }

    #[tokio::test]
    async fn test_distance() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        let reply = run(&state, "!distance London").await;
        assert!(reply.content.starts_with("Please write two city names"));

        let reply = run(&state, "!distance London, Atlantis").await;
        assert!(reply.content.starts_with("Could not find both"));
        assert!(reply.attachment.is_none());

        let reply = run(&state, "!distance London, Jakarta").await;
        assert!(reply.content.starts_with("Distance between **London** and **Jakarta**: 11"));
        assert_eq!(reply.attachment.as_ref().unwrap().filename, "distance_map.png");
        assert!(dir.path().join("distance_London_Jakarta.png").exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_distance_replies_carry_complete_images() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let state = state.clone();
            tasks.push(tokio::spawn(async move {
                let mut images = Vec::new();
                for _ in 0..4 {
                    let reply = run(&state, "!distance London, Jakarta").await;
                    images.push(decoded(&reply));
                }
                images
            }));
        }

        let mut images = Vec::new();
        for task in tasks {
            images.extend(task.await.unwrap());
        }
        assert_eq!(images.len(), 32);
        for image in &images {
            assert!(image.starts_with(b"\x89PNG"));
            assert_eq!(image, &images[0]);
        }
    }
}
