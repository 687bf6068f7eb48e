use chrono::{TimeZone, Utc};
use semver_release::actions::MemoryRuntime;
use semver_release::config::Config;
use semver_release::domain::{Commit, Tag, VersionBump};
use semver_release::provider::MockProvider;
use semver_release::{ReleaseOutcome, SemverRelease};

#[tokio::test]
async fn test_release_since_tag_end_to_end() {
    let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();

    let mut mock = MockProvider::new();
    mock.add_tag(Tag::new("v1.0.0", "A"));
    mock.add_commit(Commit::new("C2", "feat: add y"));
    mock.add_commit(Commit::new("C1", "fix: z"));
    mock.add_commit(Commit::new("A", "release").with_author_date(t0));

    let outcome = SemverRelease::new(Config::default(), &mock)
        .run()
        .await
        .unwrap();

    assert_eq!(mock.since_requests(), vec![Some(t0)]);
    assert_eq!(outcome.messages, vec!["feat: add y", "fix: z"]);
    assert_eq!(outcome.bump, VersionBump::Minor);
    assert_eq!(outcome.old_version, "v1.0.0");
    assert_eq!(outcome.new_version, "v1.1.0");
    assert!(outcome.released);

    let releases = mock.releases();
    assert_eq!(releases.len(), 1);
    let release = &releases[0];
    assert_eq!(release.tag_name, "v1.1.0");
    assert_eq!(release.name, "v1.1.0");
    assert_eq!(release.target_commitish, "master");
    assert!(!release.draft);
    assert!(!release.prerelease);
    assert_eq!(release.body, "**Changelog:**\n* feat: add y\n* fix: z\n");

    let mut runtime = MemoryRuntime::new();
    outcome.emit(&mut runtime).unwrap();
    assert_eq!(runtime.output("old-version"), Some("v1.0.0"));
    assert_eq!(runtime.output("new-version"), Some("v1.1.0"));
    assert_eq!(runtime.output("released"), Some("true"));
}

#[tokio::test]
async fn test_no_tags_and_no_markers_skips_release() {
    let mut mock = MockProvider::new();
    mock.add_commit(Commit::new("C2", "update readme"));
    mock.add_commit(Commit::new("C1", "initial import"));

    let config = Config {
        init_version: "0.0.0".to_string(),
        tag_prefix: "v".to_string(),
        ..Config::default()
    };
    let outcome = SemverRelease::new(config, &mock).run().await.unwrap();

    assert_eq!(outcome.old_version, "v0.0.0");
    assert_eq!(outcome.new_version, "");
    assert!(!outcome.released);
    assert!(mock.releases().is_empty());
    assert_eq!(mock.since_requests(), vec![None]);

    let mut runtime = MemoryRuntime::new();
    outcome.emit(&mut runtime).unwrap();
    assert_eq!(runtime.output("released"), Some("false"));
}

#[tokio::test]
async fn test_breaking_marker_anywhere_wins() {
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let mut mock = MockProvider::new();
    mock.add_tag(Tag::new("v3.4.5", "A"));
    mock.add_commit(Commit::new("C2", "feat: x"));
    mock.add_commit(Commit::new("C1", "random: BREAKING CHANGE here"));
    mock.add_commit(Commit::new("A", "release").with_author_date(t0));

    let outcome = SemverRelease::new(Config::default(), &mock)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.new_version, "v4.0.0");
    assert_eq!(mock.releases()[0].tag_name, "v4.0.0");
}

#[tokio::test]
async fn test_messages_are_normalized_for_changelog() {
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let mut mock = MockProvider::new();
    mock.add_tag(Tag::new("v0.1.0", "A"));
    mock.add_commit(Commit::new("C1", "fix: crash\r\n\r\nnull check added"));
    mock.add_commit(Commit::new("A", "release").with_author_date(t0));

    let outcome = SemverRelease::new(Config::default(), &mock)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.messages, vec!["fix: crash\nnull check added"]);
    assert_eq!(
        mock.releases()[0].body,
        "**Changelog:**\n* fix: crash\nnull check added\n"
    );
}

#[tokio::test]
async fn test_latest_tag_is_first_in_provider_order() {
    let mut mock = MockProvider::new();
    mock.add_tag(Tag::new("v2.0.0", "B"));
    mock.add_tag(Tag::new("v1.9.0", "A"));
    mock.add_commit(Commit::new("C1", "fix: y"));
    mock.add_commit(
        Commit::new("B", "release 2").with_author_date(Utc.timestamp_opt(100, 0).unwrap()),
    );

    let outcome = SemverRelease::new(Config::default(), &mock)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.old_version, "v2.0.0");
    assert_eq!(outcome.new_version, "v2.0.1");
}

#[tokio::test]
async fn test_outcome_state_round_trip() {
    let mut mock = MockProvider::new();
    mock.add_commit(Commit::new("C1", "feat: first"));

    let outcome = SemverRelease::new(Config::default(), &mock)
        .run()
        .await
        .unwrap();

    let mut runtime = MemoryRuntime::new();
    outcome.persist(&mut runtime).unwrap();
    let saved = ReleaseOutcome::restore(&runtime).unwrap().unwrap();

    assert_eq!(saved.new_version, "v0.1.0");
    assert!(saved.released);
    assert_eq!(saved.messages, vec!["feat: first"]);
}
