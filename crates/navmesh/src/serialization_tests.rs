//! Serialization tests
//!
//! These tests verify that meshes and settings survive a round trip through
//! JSON and that a deserialized mesh answers queries like the original.

#[cfg(test)]
mod tests {
    use crate::test_mesh_helpers::*;
    use crate::{BuildConfig, NavMesh, NavMeshQuery, QueryConfig, SearchStrategy};
    use glam::Vec3;

    #[test]
    fn test_navmesh_round_trip() {
        let mesh = create_l_corridor_navmesh();
        let json = serde_json::to_string(&mesh).unwrap();
        let restored: NavMesh = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.faces(), mesh.faces());
        assert_eq!(restored.vertices(), mesh.vertices());
        assert_eq!(restored.stats(), mesh.stats());
        assert!(restored.validate().is_ok());

        // The BV tree is not serialized but rebuilt while decoding
        assert!(restored.bv_tree().is_some());
        let start = Vec3::new(0.5, 0.0, 0.5);
        let end = Vec3::new(2.5, 0.0, 2.5);
        assert_eq!(
            NavMeshQuery::new(&restored).query(start, end, 0.2),
            NavMeshQuery::new(&mesh).query(start, end, 0.2)
        );
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let build: BuildConfig = serde_json::from_str(r#"{ "max_slope_angle": 45.0 }"#).unwrap();
        assert_eq!(build.max_slope_angle, 45.0);
        assert_eq!(build.down, Vec3::NEG_Y);

        let query: QueryConfig = serde_json::from_str(r#"{ "search": "a_star" }"#).unwrap();
        assert_eq!(query.search, SearchStrategy::AStar);
        assert_eq!(query.apex_epsilon, QueryConfig::default().apex_epsilon);
        assert_eq!(query.max_iterations, None);
    }

    #[test]
    fn test_tampered_mesh_is_rejected() {
        let mesh = create_grid_navmesh(2, 1);

        let mut one_way_link = serde_json::to_value(&mesh).unwrap();
        one_way_link["faces"][0]["connections"] = serde_json::json!([3, null, null]);
        assert!(serde_json::from_value::<NavMesh>(one_way_link).is_err());

        let mut missing_vertex = serde_json::to_value(&mesh).unwrap();
        missing_vertex["faces"][0]["indices"] = serde_json::json!([0, 1, 9]);
        let error = serde_json::from_value::<NavMesh>(missing_vertex).unwrap_err();
        assert!(error.to_string().contains("vertex 9"));
    }

    #[test]
    fn test_restored_mesh_answers_like_the_original() {
        let mesh = create_bridge_navmesh();
        let restored: NavMesh =
            serde_json::from_str(&serde_json::to_string(&mesh).unwrap()).unwrap();

        for point in [
            Vec3::new(1.5, 5.0, 1.5),
            Vec3::new(1.5, 0.0, 1.5),
            Vec3::new(-0.0005, 0.0, 0.5),
            Vec3::new(4.0, 0.0, 4.0),
        ] {
            assert_eq!(
                NavMeshQuery::new(&restored).locate(point),
                NavMeshQuery::new(&mesh).locate(point)
            );
        }
    }
}
