//! End-to-end behaviour of analysis, persistence and ownership checks,
//! running against the in-memory database adapter.

mod common;

use chartgenius_core::{AnalysisResult, BlockBody, ChartType, CoreError, Direction, PortError};
use chartgenius_core::DatabaseService;
use common::{app, app_with, signed_up, ScriptedModel, REVENUE_TEXT};
use uuid::Uuid;

#[tokio::test]
async fn signed_in_analysis_persists_a_document() {
    let app = app();
    let user = signed_up(&app, "ada@example.com").await;

    let result = app.state.pipeline.run(Some(&user), REVENUE_TEXT).await.unwrap();
    let AnalysisResult::Persisted { document } = result else {
        panic!("expected a persisted document");
    };

    assert_eq!(document.user_id, user.id);
    assert_eq!(document.chart_count, 1);
    assert_eq!(document.direction, Direction::Ltr);
    assert_eq!(document.blocks.len(), 2);
    assert!(matches!(document.blocks[0].body, BlockBody::Text { .. }));
    match &document.blocks[1].body {
        BlockBody::Chart { chart_config } => {
            assert_eq!(chart_config.chart_type, ChartType::Bar);
            assert_eq!(chart_config.data.len(), 3);
        }
        BlockBody::Text { .. } => panic!("second block should be a chart"),
    }
    assert_eq!(document.title, REVENUE_TEXT);
    assert_eq!(document.original_text, REVENUE_TEXT);

    let stored = app.db.get_document_by_id(document.id).await.unwrap();
    assert_eq!(stored, document);
    assert_eq!(
        stored.chart_count,
        stored.blocks.iter().filter(|b| b.is_chart()).count()
    );
}

#[tokio::test]
async fn guest_analysis_is_not_persisted() {
    let app = app();
    let persian = "گزارش فروش: فصل اول ۱ میلیون، فصل دوم ۲ میلیون";

    let result = app.state.pipeline.run(None, persian).await.unwrap();
    match result {
        AnalysisResult::Ephemeral {
            blocks,
            original_text,
            chart_count,
            direction,
        } => {
            assert_eq!(blocks.len(), 2);
            assert_eq!(original_text, persian);
            assert_eq!(chart_count, 1);
            assert_eq!(direction, Direction::Rtl);
        }
        AnalysisResult::Persisted { .. } => panic!("guests must not persist"),
    }

    let anyone = signed_up(&app, "ada@example.com").await;
    assert!(app.state.documents.list(Some(&anyone)).await.unwrap().is_empty());
}

#[tokio::test]
async fn identical_text_calls_the_model_once() {
    let app = app();
    let user = signed_up(&app, "ada@example.com").await;

    let first = app.state.pipeline.run(Some(&user), REVENUE_TEXT).await.unwrap();
    let second = app.state.pipeline.run(None, REVENUE_TEXT).await.unwrap();

    assert_eq!(app.model.calls(), 1);
    assert_eq!(first.blocks(), second.blocks());
}

#[tokio::test]
async fn short_input_is_rejected_before_the_model_is_called() {
    let app = app_with(ScriptedModel::revenue(), 50);

    let err = app.state.pipeline.run(None, "Too short to chart.").await.unwrap_err();

    assert!(matches!(err, CoreError::InvalidInput(_)));
    assert_eq!(app.model.calls(), 0);
}

#[tokio::test]
async fn rate_limit_surfaces_through_the_pipeline() {
    let model = ScriptedModel::new(|| Err(PortError::RateLimited("429".to_string())));
    let app = app_with(model, 10);

    let err = app.state.pipeline.run(None, REVENUE_TEXT).await.unwrap_err();
    let generic = CoreError::AnalysisFailure("Analysis failed".to_string());

    assert!(matches!(err, CoreError::RateLimited));
    assert_ne!(err.to_string(), generic.to_string());
    assert!(err.to_string().contains("try again"));
}

#[tokio::test]
async fn saving_requires_a_session() {
    let app = app();
    let blocks = app.state.pipeline.run(None, REVENUE_TEXT).await.unwrap().blocks().to_vec();

    let err = app
        .state
        .documents
        .save(None, REVENUE_TEXT, blocks)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::AuthRequired));
}

#[tokio::test]
async fn other_users_cannot_read_or_delete() {
    let app = app();
    let owner = signed_up(&app, "owner@example.com").await;
    let intruder = signed_up(&app, "intruder@example.com").await;

    let AnalysisResult::Persisted { document } =
        app.state.pipeline.run(Some(&owner), REVENUE_TEXT).await.unwrap()
    else {
        panic!("expected a persisted document");
    };

    let docs = &app.state.documents;
    assert!(docs.get(Some(&intruder), document.id).await.unwrap().is_none());
    assert!(docs.get(None, document.id).await.unwrap().is_none());

    docs.delete(Some(&intruder), document.id).await.unwrap();
    docs.delete(None, document.id).await.unwrap();
    assert!(docs.get(Some(&owner), document.id).await.unwrap().is_some());

    docs.delete(Some(&owner), document.id).await.unwrap();
    assert!(docs.get(Some(&owner), document.id).await.unwrap().is_none());

    // deleting again, or deleting something that never existed, is silent
    docs.delete(Some(&owner), document.id).await.unwrap();
    docs.delete(Some(&owner), Uuid::new_v4()).await.unwrap();
}

#[tokio::test]
async fn list_is_newest_first_and_summary_totals_charts() {
    let app = app();
    let user = signed_up(&app, "ada@example.com").await;
    let other = signed_up(&app, "bob@example.com").await;

    let mut saved = Vec::new();
    for i in 0..4 {
        let text = format!("{REVENUE_TEXT} (revision {i})");
        let blocks = app.state.pipeline.run(None, &text).await.unwrap().blocks().to_vec();
        saved.push(app.state.documents.save(Some(&user), &text, blocks).await.unwrap());
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    app.state.pipeline.run(Some(&other), REVENUE_TEXT).await.unwrap();

    let listed = app.state.documents.list(Some(&user)).await.unwrap();
    let listed_ids: Vec<Uuid> = listed.iter().map(|d| d.id).collect();
    let expected: Vec<Uuid> = saved.iter().rev().map(|d| d.id).collect();
    assert_eq!(listed_ids, expected);

    let summary = app.state.documents.summary(Some(&user)).await.unwrap();
    assert_eq!(summary.total_documents, 4);
    assert_eq!(summary.total_charts, 4);
    assert_eq!(summary.recent.len(), 3);
    assert_eq!(summary.recent[0].id, expected[0]);

    assert!(app.state.documents.list(None).await.unwrap().is_empty());
    assert_eq!(app.state.documents.summary(None).await.unwrap().total_documents, 0);
}

#[tokio::test]
async fn regenerate_creates_a_new_document() {
    let app = app();
    let user = signed_up(&app, "ada@example.com").await;
    let intruder = signed_up(&app, "eve@example.com").await;

    let AnalysisResult::Persisted { document } =
        app.state.pipeline.run(Some(&user), REVENUE_TEXT).await.unwrap()
    else {
        panic!("expected a persisted document");
    };

    let regenerated = app
        .state
        .pipeline
        .regenerate(Some(&user), document.id)
        .await
        .unwrap()
        .expect("owner can regenerate");
    assert_ne!(regenerated.id, document.id);
    assert_eq!(regenerated.original_text, document.original_text);
    assert_eq!(app.state.documents.list(Some(&user)).await.unwrap().len(), 2);

    let hidden = app
        .state
        .pipeline
        .regenerate(Some(&intruder), document.id)
        .await
        .unwrap();
    assert!(hidden.is_none());
}
