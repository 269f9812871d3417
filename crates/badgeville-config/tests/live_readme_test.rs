#![allow(clippy::unwrap_used)]
// Live walk through the README use case against a real Berlin host.
//
//   BADGEVILLE_HOST_NAME=http://staging.badgeville.com \
//   BADGEVILLE_API_KEY=... \
//   BADGEVILLE_NETWORK_ID=4d5dc61ed0c0b32b79000001 \
//   cargo test -p badgeville-config --test live_readme_test -- --ignored
//
// Every run uses fresh names so it can be repeated against the same network.

use std::time::{SystemTime, UNIX_EPOCH};

use badgeville_config::{ENV_PROFILE, Defaults, env_profile, profile_to_client_config};
use badgeville_core::{
    Activity, ActivityDefinition, Adjustment, Player, Query, Record, Reward, RewardComponent,
    RewardDefinition, RewardTemplate, Site, User,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_NETWORK_ID: &str = "4d5dc61ed0c0b32b79000001";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("badgeville=debug")),
        )
        .with_test_writer()
        .try_init();
}

#[tokio::test]
#[ignore = "needs BADGEVILLE_HOST_NAME and BADGEVILLE_API_KEY for a live host"]
#[allow(clippy::too_many_lines)]
async fn live_readme_use_case() {
    init_tracing();

    let profile = env_profile().expect("BADGEVILLE_HOST_NAME must be set");
    let client = profile_to_client_config(&profile, ENV_PROFILE, &Defaults::default())
        .unwrap()
        .connect()
        .unwrap();

    let network_id =
        std::env::var("BADGEVILLE_NETWORK_ID").unwrap_or_else(|_| DEFAULT_NETWORK_ID.into());
    let run = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();

    let mut site = Record::new(Site::new(
        format!("My Website {run}"),
        format!("mydomain{run}.com"),
        network_id.as_str(),
    ));
    assert!(site.save(&client).await.unwrap(), "{}", site.errors());
    let site_id = site.id().cloned().unwrap();

    let email = format!("visitor{run}@emailserver.com");
    let mut user = Record::new(User::new(
        format!("visitor{run}"),
        network_id.as_str(),
        email.as_str(),
        "visitor_password",
    ));
    assert!(user.save(&client).await.unwrap(), "{}", user.errors());
    let user_id = user.id().cloned().unwrap();

    let mut duplicate = Record::new(User::new(
        format!("visitor{run}"),
        network_id.as_str(),
        email.as_str(),
        "visitor_password",
    ));
    assert!(!duplicate.save(&client).await.unwrap());
    assert_eq!(duplicate.errors().get("email"), ["user email is already taken"]);

    let new_email = format!("visitor{run}b@emailserver.com");
    let mut found = Record::<User>::find(&client, &user_id).await.unwrap();
    found.email = Some(new_email.clone());
    assert!(found.save(&client).await.unwrap(), "{}", found.errors());
    let refetched = Record::<User>::find(&client, &user_id).await.unwrap();
    assert_eq!(refetched.email.as_deref(), Some(new_email.as_str()));

    let mut player = Record::new(Player::new(
        site_id.clone(),
        user_id.clone(),
        format!("Visitor {run}"),
    ));
    assert!(player.save(&client).await.unwrap(), "{}", player.errors());
    let player_id = player.id().cloned().unwrap();

    let mut share = Record::new(Activity::new("share", player_id.clone()));
    assert!(share.save(&client).await.unwrap(), "{}", share.errors());

    let mut definition = Record::new(ActivityDefinition::for_verb(
        site_id.clone(),
        format!("A Cool Comment Behavior {run}"),
        "comment",
        4,
    ));
    assert!(definition.save(&client).await.unwrap(), "{}", definition.errors());

    definition.adjustment = Some(Adjustment::points(3));
    definition.rate_limit(180, 25);
    assert!(definition.save(&client).await.unwrap(), "{}", definition.errors());

    let reread = Record::<ActivityDefinition>::find(&client, definition.id().unwrap())
        .await
        .unwrap();
    assert_eq!(reread.adjustment.as_ref().and_then(|a| a.points), Some(3));
    assert_eq!(reread.enable_rate_limiting, Some(true));
    assert_eq!(reread.bucket_drain_rate, Some(180));
    assert_eq!(reread.bucket_max_capacity, Some(25));

    let mut reward_definition = Record::new(RewardDefinition {
        reward_template: Some(RewardTemplate::message(
            "Congrats, you are a Comment Rockstar!",
        )),
        components: Some(vec![RewardComponent::count_at_least("comment", 1)]),
        active: Some(true),
        ..RewardDefinition::new(site_id.clone(), "Comment Rockstar")
    });
    assert!(
        reward_definition.save(&client).await.unwrap(),
        "{}",
        reward_definition.errors()
    );

    let mut comment = Record::new(Activity::new("comment", player_id.clone()));
    assert!(comment.save(&client).await.unwrap(), "{}", comment.errors());

    let rewards = Record::<Reward>::find_all(&client, &Query::new().player_id(&player_id))
        .await
        .unwrap();
    assert_eq!(
        rewards.first().and_then(|r| r.name.as_deref()),
        Some("Comment Rockstar")
    );
}
