//! The square scenario through the public API only.

use cgmath::{Matrix4, Point2, Point3, Vector3};
use hull::{Hull, Ring, TopologyError};


fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn square() -> Vec<Point2<f64>> {
    vec![
        Point2::new(1.0, 1.0),
        Point2::new(-1.0, 1.0),
        Point2::new(-1.0, -1.0),
        Point2::new(1.0, -1.0),
    ]
}

#[test]
fn import_and_split() {
    init_logger();

    let (mut hull, face) = Hull::from_polygon(square()).unwrap();
    hull.check_integrity();
    assert_eq!(hull.face_count(), 1);
    assert_eq!(hull.vertex_count(), 4);
    assert_eq!(hull.edge_count(), 4);
    assert_eq!(hull.line_indices().len(), 8);
    assert_eq!(
        hull.vertex_array(),
        square().into_iter().map(Some).collect::<Vec<_>>(),
    );
    assert_eq!(format!("{:?}", hull), "Hull(edges: 4, vertices: 4, faces: 1)");

    let corners: Vec<_> = face.edges(&hull)
        .map(|hull, he| he.origin(hull))
        .map(|hull, v| v.position(hull).cloned())
        .sequence()
        .collect();
    assert_eq!(corners, square());

    let v = face.split(&mut hull, Point2::new(0.0, 0.0)).unwrap();
    hull.check_integrity();
    assert_eq!(hull.face_count(), 4);
    assert_eq!(hull.vertex_count(), 5);
    assert_eq!(hull.edge_count(), 8);
    assert_eq!(v.position(&hull), Some(&Point2::new(0.0, 0.0)));
    assert_eq!(hull.triangle_indices().len(), 12);
    assert_eq!(hull.line_indices().len(), 16);
    assert_eq!(hull.edges().count(), 8);

    // The old handle saw its boundary being rewired
    assert!(!face.is_valid(&hull));
    assert_eq!(face.split(&mut hull, Point2::new(0.5, 0.0)), Err(TopologyError::StaleHandle));
}

#[test]
fn split_every_triangle_again() {
    init_logger();

    let (mut hull, face) = Hull::from_polygon(square()).unwrap();
    let center = face.split(&mut hull, Point2::new(0.0, 0.0)).unwrap();

    // Collect the faces first: splitting invalidates the circulator's
    // principal.
    let faces: Vec<_> = center.faces(&hull).sequence().map(|f| f.edge().id()).collect();
    assert_eq!(faces.len(), 4);
    for he in faces {
        let f = hull.half_edge(he).face(&hull).unwrap();
        let corners: Vec<_> = f.vertices(&hull)
            .map(|hull, v| v.position(hull).cloned())
            .sequence()
            .collect();
        let x = corners.iter().map(|p| p.x).sum::<f64>() / 3.0;
        let y = corners.iter().map(|p| p.y).sum::<f64>() / 3.0;
        f.split(&mut hull, Point2::new(x, y)).unwrap();
        hull.check_integrity();
    }

    assert_eq!(hull.face_count(), 12);
    assert_eq!(hull.vertex_count(), 9);
    assert_eq!(hull.edge_count(), 20);
    assert_eq!(hull.triangle_indices().len(), 36);

    // Euler characteristic of a disc: V - E + F (including the outside) = 2
    let chi = hull.vertex_count() as i64 - hull.edge_count() as i64
        + hull.face_count() as i64 + 1;
    assert_eq!(chi, 2);
}

#[test]
fn border_circulation() {
    let (hull, face) = Hull::from_polygon(square()).unwrap();
    let outside = face.edge().mate(&hull).unwrap();
    let ring: Vec<_> = outside.face(&hull).unwrap().edges(&hull).sequence().collect();

    assert_eq!(ring.len(), 4);
    assert!(ring.iter().all(|he| he.is_border(&hull)));
    assert!(ring.iter().all(|he| he.face(&hull).unwrap().is_null()));

    let c = face.edges(&hull);
    assert_eq!(c.ring(), Ring::Face);
    assert_eq!(c.principal(), face.edge());
    assert!(c.is_valid());
}

#[test]
fn transform_3d() {
    let mut hull = Hull::new();
    let e = hull.make_shell(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0));
    hull.transform(&Matrix4::from_translation(Vector3::new(0.0, 0.0, 2.0)));

    assert!(e.is_valid(&hull));
    assert_eq!(hull.vertex_array(), vec![
        Some(Point3::new(0.0, 0.0, 2.0)),
        Some(Point3::new(1.0, 0.0, 2.0)),
    ]);
}
