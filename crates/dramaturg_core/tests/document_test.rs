use chrono::{TimeZone, Utc};
use dramaturg_core::{
    AnalysisSource, Episode, EpisodeCountAnalysis, QualityDimension, QualityMetrics,
    QualityStatus, Scene, ScriptDocument, ScriptMetadata, StoryStructure,
};

fn document(episodes: Vec<Episode>, total_duration: u32) -> ScriptDocument {
    ScriptDocument {
        metadata: ScriptMetadata {
            title: "The Heir Returns".to_string(),
            episode_count: episodes.len() as u32,
            requested_episodes: episodes.len() as u32,
            total_duration,
            story_type: "revenge".to_string(),
            generation_timestamp: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        },
        adaptation_analysis: "analysis".to_string(),
        adapted_story: "story".to_string(),
        story_structure: StoryStructure::default(),
        episodes,
        quality_metrics: QualityMetrics::default(),
        raw_content: String::new(),
    }
}

#[test]
fn scene_serializes_camel_case() -> anyhow::Result<()> {
    let scene = Scene {
        scene_id: 3,
        character_actions: "She slams the door".to_string(),
        scene_conflict: Some("betrayal".to_string()),
        ..Default::default()
    };
    let value = serde_json::to_value(&scene)?;
    assert_eq!(value["sceneId"], 3);
    assert_eq!(value["characterActions"], "She slams the door");
    assert_eq!(value["sceneConflict"], "betrayal");
    assert!(value.get("adaptationNote").is_none());
    assert!(value["audioDesign"].get("backgroundMusic").is_some());
    Ok(())
}

#[test]
fn timestamp_is_rfc3339() -> anyhow::Result<()> {
    let value = serde_json::to_value(document(Vec::new(), 0))?;
    assert_eq!(value["metadata"]["generationTimestamp"], "2026-01-02T03:04:05Z");
    assert_eq!(value["qualityMetrics"]["qualityStatus"], "FAIL");
    Ok(())
}

#[test]
fn episode_duration_recomputed_from_scenes() {
    let mut episode = Episode {
        scenes: vec![
            Scene {
                duration: 4,
                ..Default::default()
            },
            Scene {
                duration: 7,
                ..Default::default()
            },
        ],
        ..Default::default()
    };
    episode.recompute_duration();
    assert_eq!(episode.duration, 11);
}

#[test]
fn implied_duration_uses_episode_count() {
    let episodes = vec![Episode::default(), Episode::default(), Episode::default()];
    let doc = document(episodes, 180);
    assert_eq!(doc.implied_episode_duration(), Some(60));

    let empty = document(Vec::new(), 0);
    assert_eq!(empty.implied_episode_duration(), None);
}

#[test]
fn completeness_target_prefers_requested_count() -> anyhow::Result<()> {
    let mut doc = document(vec![Episode::default(), Episode::default()], 120);
    doc.metadata.requested_episodes = 5;
    assert_eq!(doc.completeness_target(), 5);

    let mut value = serde_json::to_value(&doc)?;
    assert_eq!(value["metadata"]["requestedEpisodes"], 5);
    value["metadata"]
        .as_object_mut()
        .map(|metadata| metadata.remove("requestedEpisodes"));
    let legacy: ScriptDocument = serde_json::from_value(value)?;
    assert_eq!(legacy.metadata.requested_episodes, 0);
    assert_eq!(legacy.completeness_target(), 2);
    Ok(())
}

#[test]
fn status_thresholds() {
    assert_eq!(QualityStatus::from_score(9.2), QualityStatus::Pass);
    assert_eq!(QualityStatus::from_score(6.0), QualityStatus::RevisionNeeded);
    assert_eq!(QualityStatus::from_score(1.0), QualityStatus::Fail);
    assert_eq!(QualityStatus::RevisionNeeded.to_string(), "REVISION_NEEDED");
}

#[test]
fn failing_dimensions_are_below_eight() {
    let metrics = QualityMetrics {
        structure_score: 9,
        conflict_score: 8,
        pacing_score: 7,
        dialogue_score: 8,
        visual_score: 5,
        overall_score: 7.4,
        quality_status: QualityStatus::RevisionNeeded,
        issues: Vec::new(),
        suggestions: Vec::new(),
    };
    assert_eq!(
        metrics.failing_dimensions(),
        vec![QualityDimension::Pacing, QualityDimension::Visual]
    );
}

#[test]
fn analysis_count_is_clamped() {
    let analysis = EpisodeCountAnalysis::new(45, "long saga", AnalysisSource::Model);
    assert_eq!(analysis.recommended_episodes, 30);
    let analysis = EpisodeCountAnalysis::new(0, "", AnalysisSource::Heuristic);
    assert_eq!(analysis.recommended_episodes, 1);
    assert_eq!(AnalysisSource::Heuristic.to_string(), "heuristic");
}
