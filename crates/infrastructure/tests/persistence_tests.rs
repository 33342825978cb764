//! Integration tests for the route stores using in-memory SQLite databases
//!
//! The importer and query engine run against the real sqlx adapters here.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use application::{
    CommitMode, ImportReport, ImportService, ImportServiceConfig, RouteQueryConfig,
    RouteQueryService,
    ports::{RouteQueryPort, RouteWriteStore},
};
use domain::{Direction, RawRoutePayload, RouteDetail, RouteNumber, StopId, StopName};
use infrastructure::{
    load_payloads,
    persistence::{AsyncDatabase, AsyncDatabaseConfig, SqliteRouteQueryStore, SqliteRouteStore},
};

// ============================================================================
// Test Helpers
// ============================================================================

async fn create_test_db() -> AsyncDatabase {
    let db = AsyncDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Failed to run migrations");
    db
}

fn importer(db: &AsyncDatabase, mode: CommitMode) -> ImportService {
    ImportService::new(
        Arc::new(SqliteRouteStore::new(db.pool().clone())),
        ImportServiceConfig { commit_mode: mode },
    )
}

fn query_service(db: &AsyncDatabase) -> RouteQueryService {
    RouteQueryService::new(
        Arc::new(SqliteRouteQueryStore::new(db.pool().clone())),
        RouteQueryConfig::default(),
    )
}

async fn import(db: &AsyncDatabase, payloads: &[RawRoutePayload]) -> ImportReport {
    importer(db, CommitMode::PerPayload)
        .import_payloads(payloads)
        .await
        .expect("import failed")
}

async fn count(db: &AsyncDatabase, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(db.pool())
        .await
        .unwrap()
}

async fn stop_id(db: &AsyncDatabase, name: &str) -> StopId {
    let id: i64 = sqlx::query_scalar("SELECT id FROM stops WHERE name = $1")
        .bind(name)
        .fetch_one(db.pool())
        .await
        .unwrap();
    StopId::new(id)
}

fn stop_names(detail: &RouteDetail) -> Vec<&str> {
    detail.stops.iter().map(|s| s.name.as_str()).collect()
}

fn route_20_down() -> RawRoutePayload {
    RawRoutePayload::new(
        "20",
        "down",
        ["Kharar", " Sante  Majra", "Chappar Chiri", "ISBT Sector 43"],
    )
}

// ============================================================================
// Import Tests
// ============================================================================

mod import_tests {
    use super::*;

    #[tokio::test]
    async fn route_20_down_is_stored_normalized() {
        let db = create_test_db().await;

        let report = import(&db, &[route_20_down()]).await;
        assert_eq!(report.succeeded, 1);

        let detail = query_service(&db)
            .get_route_detail("20", "DOWN")
            .await
            .unwrap()
            .expect("route should exist");
        let seqs: Vec<u32> = detail.stops.iter().map(|s| s.sequence_no).collect();

        assert_eq!(detail.direction, Direction::Down);
        assert_eq!(seqs, vec![1, 2, 3, 4]);
        assert_eq!(
            stop_names(&detail),
            vec!["Kharar", "Sante Majra", "Chappar Chiri", "ISBT Sector 43"]
        );
    }

    #[tokio::test]
    async fn reimport_is_idempotent() {
        let db = create_test_db().await;
        import(&db, &[route_20_down()]).await;

        let rows_before: Vec<(i64, i64, i64)> =
            sqlx::query_as("SELECT route_id, stop_id, sequence_no FROM route_stops ORDER BY 1, 3")
                .fetch_all(db.pool())
                .await
                .unwrap();
        let report = import(&db, &[route_20_down()]).await;
        let rows_after: Vec<(i64, i64, i64)> =
            sqlx::query_as("SELECT route_id, stop_id, sequence_no FROM route_stops ORDER BY 1, 3")
                .fetch_all(db.pool())
                .await
                .unwrap();

        assert_eq!(report.succeeded, 1);
        assert_eq!(count(&db, "routes").await, 1);
        assert_eq!(count(&db, "stops").await, 4);
        assert_eq!(rows_before, rows_after);
    }

    #[tokio::test]
    async fn reimport_with_fewer_stops_replaces_itinerary() {
        let db = create_test_db().await;
        import(&db, &[route_20_down()]).await;

        import(
            &db,
            &[RawRoutePayload::new("20", "DOWN", ["Kharar", "ISBT Sector 43"])],
        )
        .await;

        let detail = query_service(&db)
            .get_route_detail("20", "down")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stop_names(&detail), vec!["Kharar", "ISBT Sector 43"]);
        assert_eq!(count(&db, "route_stops").await, 2);

        let sante = stop_id(&db, "Sante Majra").await;
        let routes = query_service(&db)
            .get_routes_for_stop(sante)
            .await
            .unwrap()
            .unwrap();
        assert!(routes.routes.is_empty());
    }

    #[tokio::test]
    async fn stops_are_shared_case_insensitively() {
        let db = create_test_db().await;

        import(
            &db,
            &[
                RawRoutePayload::new("20", "UP", ["Kharar", "Mohali"]),
                RawRoutePayload::new("5", "UP", ["KHARAR", "Landran"]),
            ],
        )
        .await;

        assert_eq!(count(&db, "stops").await, 3);
        let detail = query_service(&db)
            .get_route_detail("5", "UP")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stop_names(&detail), vec!["Kharar", "Landran"]);
    }

    #[tokio::test]
    async fn non_ascii_case_variants_are_distinct_stops() {
        let db = create_test_db().await;

        let report = import(
            &db,
            &[RawRoutePayload::new("7", "UP", ["Ärzte Haus", "ärzte haus", "Mohali"])],
        )
        .await;

        assert_eq!(report.succeeded, 1);
        assert_eq!(count(&db, "stops").await, 3);

        let service = query_service(&db);
        let names = |stops: Vec<domain::Stop>| -> Vec<String> {
            stops.into_iter().map(|s| s.name).collect()
        };
        assert_eq!(
            names(service.search_stops("Ärzte", 10).await.unwrap()),
            vec!["Ärzte Haus"]
        );
        assert_eq!(
            names(service.search_stops("ärzte", 10).await.unwrap()),
            vec!["ärzte haus"]
        );
        assert_eq!(
            names(service.search_stops("Ärzte HAUS", 10).await.unwrap()),
            vec!["Ärzte Haus"]
        );
    }

    #[tokio::test]
    async fn invalid_payloads_write_nothing() {
        let db = create_test_db().await;

        let report = import(
            &db,
            &[
                RawRoutePayload::new("20", "sideways", ["A", "B"]),
                RawRoutePayload::new("21", "UP", ["Only"]),
                RawRoutePayload::new("22", "UP", ["A", "b ", "a"]),
            ],
        )
        .await;

        assert_eq!(report.failed, 3);
        assert_eq!(count(&db, "routes").await, 0);
        assert_eq!(count(&db, "stops").await, 0);
    }

    #[tokio::test]
    async fn batch_mode_commits_accepted_payloads() {
        let db = create_test_db().await;

        let report = importer(&db, CommitMode::Batch)
            .import_payloads(&[
                route_20_down(),
                RawRoutePayload::new("20", "UP", ["ISBT Sector 43"]),
                RawRoutePayload::new("20", "UP", ["ISBT Sector 43", "Kharar"]),
            ])
            .await
            .unwrap();

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(count(&db, "routes").await, 2);
        assert_eq!(count(&db, "route_stops").await, 6);
    }

    #[tokio::test]
    async fn directory_import_reports_per_file() {
        let db = create_test_db().await;
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("01-route20.json"),
            r#"{"route_number": 20, "direction": "down", "stops": ["Kharar", "Mohali"]}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("02-broken.json"), "{").unwrap();
        std::fs::write(
            dir.path().join("03-loop.json"),
            r#"{"route_number": "7", "direction": "UP", "stops": ["A", "B", "A"]}"#,
        )
        .unwrap();

        let inputs = load_payloads(dir.path(), "json").await.unwrap();
        let report = importer(&db, CommitMode::PerPayload)
            .import_batch(inputs)
            .await
            .unwrap();

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 2);
        assert!(report.errors[0].source.ends_with("02-broken.json"));
        assert_eq!(report.errors[0].error.kind(), "parse");
        assert_eq!(report.errors[1].error.kind(), "validation");
    }
}

// ============================================================================
// Query Tests
// ============================================================================

mod query_tests {
    use super::*;

    #[tokio::test]
    async fn route_matches_respect_direction_order() {
        let db = create_test_db().await;
        import(&db, &[route_20_down()]).await;
        let service = query_service(&db);

        let forward = service
            .find_route_matches("Kharar", "ISBT Sector 43", 30)
            .await
            .unwrap();
        assert_eq!(forward.len(), 1);
        assert_eq!(forward[0].from_sequence, 1);
        assert_eq!(forward[0].to_sequence, 4);

        let backward = service
            .find_route_matches("ISBT Sector 43", "Kharar", 30)
            .await
            .unwrap();
        assert!(backward.is_empty());
    }

    #[tokio::test]
    async fn match_exists_only_for_earlier_origin() {
        let db = create_test_db().await;
        let stops = ["S1", "S2", "S3", "S4", "S5"];
        import(&db, &[RawRoutePayload::new("9", "UP", stops)]).await;
        let service = query_service(&db);

        for (i, from) in stops.iter().enumerate() {
            for (j, to) in stops.iter().enumerate() {
                let matches = service.find_route_matches(from, to, 30).await.unwrap();
                assert_eq!(matches.len(), usize::from(i < j), "{from} -> {to}");
            }
        }
    }

    #[tokio::test]
    async fn opposite_direction_is_evaluated_independently() {
        let db = create_test_db().await;
        import(
            &db,
            &[
                route_20_down(),
                RawRoutePayload::new("20", "UP", ["ISBT Sector 43", "Chappar Chiri", "Kharar"]),
            ],
        )
        .await;

        let matches = query_service(&db)
            .find_route_matches("ISBT Sector 43", "Kharar", 30)
            .await
            .unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].direction, Direction::Up);
    }

    #[tokio::test]
    async fn matches_are_sorted_by_route_number_and_capped() {
        let db = create_test_db().await;
        import(
            &db,
            &[
                RawRoutePayload::new("5", "UP", ["A", "B"]),
                RawRoutePayload::new("20", "UP", ["A", "X", "B"]),
                RawRoutePayload::new("100", "DOWN", ["A", "B"]),
            ],
        )
        .await;
        let service = query_service(&db);

        let all = service.find_route_matches("a", " b ", 30).await.unwrap();
        let numbers: Vec<&str> = all.iter().map(|m| m.route_number.as_str()).collect();
        assert_eq!(numbers, vec!["100", "20", "5"]);

        let capped = service.find_route_matches("A", "B", 2).await.unwrap();
        assert_eq!(capped.len(), 2);
    }

    #[tokio::test]
    async fn unknown_stop_matches_nothing() {
        let db = create_test_db().await;
        import(&db, &[route_20_down()]).await;

        let matches = query_service(&db)
            .find_route_matches("Kharar", "Nowhere", 30)
            .await
            .unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn stops_between_is_inclusive() {
        let db = create_test_db().await;
        import(&db, &[route_20_down()]).await;
        let service = query_service(&db);
        let m = &service
            .find_route_matches("Sante Majra", "ISBT Sector 43", 30)
            .await
            .unwrap()[0];

        let stops = service
            .get_stops_between(m.route_id, m.from_sequence, m.to_sequence)
            .await
            .unwrap();
        assert_eq!(stops, vec!["Sante Majra", "Chappar Chiri", "ISBT Sector 43"]);

        let none = service.get_stops_between(m.route_id, 7, 9).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn search_routes_enriches_results() {
        let db = create_test_db().await;
        import(&db, &[route_20_down()]).await;

        let results = query_service(&db)
            .search_routes("kharar", "chappar chiri")
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].stops_between.as_deref().unwrap(),
            ["Kharar", "Sante Majra", "Chappar Chiri"]
        );
    }

    #[tokio::test]
    async fn missing_route_detail_is_none() {
        let db = create_test_db().await;
        import(&db, &[route_20_down()]).await;

        let detail = query_service(&db).get_route_detail("20", "UP").await.unwrap();
        assert!(detail.is_none());
    }

    #[tokio::test]
    async fn routes_for_stop_ordered_by_number_then_direction() {
        let db = create_test_db().await;
        import(
            &db,
            &[
                RawRoutePayload::new("5", "UP", ["Kharar", "Landran"]),
                RawRoutePayload::new("20", "UP", ["Mohali", "Kharar"]),
                route_20_down(),
            ],
        )
        .await;
        let kharar = stop_id(&db, "Kharar").await;

        let result = query_service(&db)
            .get_routes_for_stop(kharar)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.stop_name, "Kharar");
        let entries: Vec<(&str, Direction, u32)> = result
            .routes
            .iter()
            .map(|r| (r.route_number.as_str(), r.direction, r.sequence_no))
            .collect();
        assert_eq!(
            entries,
            vec![
                ("20", Direction::Down, 1),
                ("20", Direction::Up, 2),
                ("5", Direction::Up, 1),
            ]
        );
    }

    #[tokio::test]
    async fn routes_for_unknown_stop_is_none() {
        let db = create_test_db().await;

        let result = query_service(&db)
            .get_routes_for_stop(StopId::new(404))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn stop_search_is_case_insensitive_prefix() {
        let db = create_test_db().await;
        import(
            &db,
            &[
                route_20_down(),
                RawRoutePayload::new("5", "UP", ["Sector 17", "sector 22", "Mohali"]),
            ],
        )
        .await;
        let service = query_service(&db);

        let stops = service.search_stops("SEC", 10).await.unwrap();
        let names: Vec<&str> = stops.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Sector 17", "sector 22"]);

        let capped = service.search_stops("sector", 1).await.unwrap();
        assert_eq!(capped.len(), 1);

        let substring = service.search_stops("43", 10).await.unwrap();
        assert!(substring.is_empty());
    }

    #[tokio::test]
    async fn stop_search_treats_wildcards_literally() {
        let db = create_test_db().await;
        import(
            &db,
            &[RawRoutePayload::new("1", "UP", ["Phase_1", "Phase 10", "50% Market"])],
        )
        .await;
        let service = query_service(&db);

        let underscore = service.search_stops("Phase_", 10).await.unwrap();
        assert_eq!(underscore.len(), 1);
        assert_eq!(underscore[0].name, "Phase_1");

        assert!(service.search_stops("%", 10).await.unwrap().is_empty());
        assert_eq!(service.search_stops("50%", 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn autocomplete_echoes_normalized_query() {
        let db = create_test_db().await;
        import(&db, &[route_20_down()]).await;

        let result = query_service(&db)
            .autocomplete("  sante   ", None)
            .await
            .unwrap();
        assert_eq!(result.query, "sante");
        assert_eq!(result.results[0].name, "Sante Majra");
    }
}

// ============================================================================
// Isolation Tests
// ============================================================================

mod isolation_tests {
    use super::*;

    #[tokio::test]
    async fn readers_see_old_itinerary_until_commit() {
        let dir = tempfile::tempdir().unwrap();
        let config = AsyncDatabaseConfig {
            max_connections: 2,
            ..AsyncDatabaseConfig::file(dir.path().join("routes.db"))
        };
        let db = AsyncDatabase::new(&config).await.unwrap();
        db.migrate().await.unwrap();
        import(&db, &[route_20_down()]).await;

        let writer = SqliteRouteStore::new(db.pool().clone());
        let reader = SqliteRouteQueryStore::new(db.pool().clone());
        let number = RouteNumber::parse("20").unwrap();

        let mut unit = writer.begin().await.unwrap();
        let route = unit.upsert_route(&number, Direction::Down).await.unwrap();
        let only = unit
            .upsert_stop(&StopName::parse("Kharar").unwrap())
            .await
            .unwrap();
        unit.replace_route_stops(route, &[only]).await.unwrap();

        let during = reader
            .route_detail(&number, Direction::Down)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(during.stops.len(), 4);

        unit.commit().await.unwrap();

        let after = reader
            .route_detail(&number, Direction::Down)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stop_names(&after), vec!["Kharar"]);

        db.close().await;
    }
}
