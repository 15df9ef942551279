use narwhal_core::geom::{Point, VectorExt, WorldSpace, between, point};
use narwhal_core::{Edge, Graph, LayoutOptions, Node, RankDir};
use narwhal_render::paths::{
    PathOptions, is_path_backwards, is_point_unimportant, path_point_data,
};
use narwhal_render::{Error, curved_path, points_to_lines, triangle_points};

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6
}

fn layout(dir: RankDir) -> LayoutOptions {
    LayoutOptions {
        rank_direction: dir,
        ..Default::default()
    }
}

fn two_node_graph(src: Node, dest: Node, points: Vec<Point>) -> (Graph, Edge) {
    let mut g = Graph::new();
    g.add_node(src).unwrap();
    g.add_node(dest).unwrap();
    let edge = Edge::new("e", "src", "dest").with_points(points);
    g.add_edge(edge.clone()).unwrap();
    (g, edge)
}

/// `v` as it appears in path and polygon strings.
fn printed(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

fn numbers(s: &str) -> Vec<f64> {
    s.split([' ', ','])
        .filter(|t| !t.is_empty() && *t != "M" && *t != "C")
        .map(|t| t.parse::<f64>().unwrap())
        .collect()
}

#[test]
fn points_to_lines_needs_two_points() {
    assert_eq!(points_to_lines::<WorldSpace>(&[]), "");
    assert_eq!(points_to_lines::<WorldSpace>(&[point(3.0, 4.0)]), "");
    assert_eq!(
        points_to_lines::<WorldSpace>(&[point(0.0, 0.0), point(1.0, 1.0)]),
        "M 0,0 1,1"
    );
    assert_eq!(
        points_to_lines::<WorldSpace>(&[
            point(0.0, 0.0),
            point(10.5, -2.0),
            point(20.0, 4.0),
        ]),
        "M 0,0 10.5,-2 20,4"
    );
}

#[test]
fn curved_path_two_points_runs_connector_to_connector_in_every_direction() {
    for dir in [RankDir::TB, RankDir::BT, RankDir::LR, RankDir::RL] {
        let src = Node::new("src", 80.0, 40.0).at(10.0, 20.0);
        let downstream = point(10.0, 20.0) + dir.flow() * 200.0;
        let dest = Node::new("dest", 60.0, 30.0).at(downstream.x, downstream.y);
        let start = src.output_connector(dir).unwrap();
        let end = dest.input_connector(dir).unwrap();
        let (g, edge) = two_node_graph(src, dest, Vec::new());

        let d = curved_path(&g, &edge, &layout(dir)).unwrap();

        let head = d.split(" C ").next().unwrap();
        let nums = numbers(&d);
        assert_eq!(numbers(head), vec![start.x, start.y], "{dir:?}: {d}");
        assert_eq!(nums[nums.len() - 2..], [end.x, end.y], "{dir:?}: {d}");
        assert_eq!(d.matches(" C ").count(), 1, "{dir:?}: {d}");

        // Both handles follow the flow with the stock 20px length.
        let h = dir.flow() * 20.0;
        assert_eq!(
            nums[2..6],
            [start.x + h.x, start.y + h.y, end.x - h.x, end.y - h.y],
            "{dir:?}: {d}"
        );
    }
}

#[test]
fn curved_path_exact_top_to_bottom() {
    let (g, edge) = two_node_graph(
        Node::new("src", 100.0, 40.0).at(0.0, 0.0),
        Node::new("dest", 100.0, 40.0).at(0.0, 200.0),
        Vec::new(),
    );
    assert_eq!(
        curved_path(&g, &edge, &layout(RankDir::TB)).unwrap(),
        "M 0,20 C 0,40 0,160 0,180"
    );
}

#[test]
fn curved_path_ignores_stale_endpoint_waypoints() {
    let (g, edge) = two_node_graph(
        Node::new("src", 100.0, 40.0).at(0.0, 0.0),
        Node::new("dest", 100.0, 40.0).at(0.0, 200.0),
        vec![point(-999.0, -999.0), point(999.0, 999.0)],
    );
    assert_eq!(
        curved_path(&g, &edge, &layout(RankDir::TB)).unwrap(),
        "M 0,20 C 0,40 0,160 0,180"
    );
}

#[test]
fn curved_path_backwards_edge_is_smoothed() {
    let (g, edge) = two_node_graph(
        Node::new("src", 100.0, 40.0).at(0.0, 200.0),
        Node::new("dest", 100.0, 40.0).at(0.0, 0.0),
        Vec::new(),
    );
    assert_eq!(
        curved_path(&g, &edge, &layout(RankDir::TB)).unwrap(),
        "M 0,220 C 0,218 0,-18 0,-20"
    );
}

#[test]
fn curved_path_smooths_unimportant_and_curves_important_waypoints() {
    let (g, edge) = two_node_graph(
        Node::new("src", 100.0, 40.0).at(0.0, 0.0),
        Node::new("dest", 100.0, 40.0).at(0.0, 200.0),
        vec![point(0.0, 0.0), point(5.0, 100.0), point(0.0, 0.0)],
    );
    assert_eq!(
        curved_path(&g, &edge, &layout(RankDir::TB)).unwrap(),
        "M 0,20 C 0,40 5,98 5,100 C 5,102 0,160 0,180"
    );

    let (g, edge) = two_node_graph(
        Node::new("src", 100.0, 40.0).at(0.0, 0.0),
        Node::new("dest", 100.0, 40.0).at(0.0, 200.0),
        vec![point(0.0, 0.0), point(100.0, 100.0), point(0.0, 0.0)],
    );
    assert_eq!(
        curved_path(&g, &edge, &layout(RankDir::TB)).unwrap(),
        "M 0,20 C 0,40 100,80 100,100 C 100,120 0,160 0,180"
    );
}

#[test]
fn unimportance_threshold_is_inclusive() {
    let opts = PathOptions::default();

    let on_threshold = [point(0.0, 0.0), point(20.0, 50.0), point(0.0, 100.0)];
    assert!(is_point_unimportant(on_threshold[0], on_threshold[1], on_threshold[2], 20.0));
    let data = path_point_data(&on_threshold, RankDir::TB, &opts);
    assert_eq!(data[1].incoming_control, point(20.0, 48.0));
    assert_eq!(data[1].outgoing_control, point(20.0, 52.0));

    let past_threshold = [point(0.0, 0.0), point(20.01, 50.0), point(0.0, 100.0)];
    assert!(!is_point_unimportant(
        past_threshold[0],
        past_threshold[1],
        past_threshold[2],
        20.0
    ));
    let data = path_point_data(&past_threshold, RankDir::TB, &opts);
    assert_eq!(data[1].incoming_control, point(20.01, 30.0));
    assert_eq!(data[1].outgoing_control, point(20.01, 70.0));
}

#[test]
fn one_backwards_segment_smooths_the_whole_path() {
    let pts = [
        point(0.0, 20.0),
        point(100.0, 100.0),
        point(100.0, 60.0),
        point(0.0, 180.0),
    ];
    assert!(is_path_backwards(&pts, RankDir::TB));
    let data = path_point_data(&pts, RankDir::TB, &PathOptions::default());
    assert_eq!(data.len(), 4);
    for d in &data {
        let handle = between(d.point, d.outgoing_control);
        assert!(
            (handle.length() - 2.0).abs() < 0.01,
            "expected a smoothed 2px handle, got {handle:?}"
        );
        let mirrored = d.point - handle;
        assert!(approx_eq(mirrored.x, d.incoming_control.x));
        assert!(approx_eq(mirrored.y, d.incoming_control.y));
    }
    assert_eq!(data[0].outgoing_control, point(1.56, 21.25));
}

#[test]
fn collinear_points_take_the_smoothing_branch() {
    let cases = [
        (point(0.0, 0.0), point(0.0, 50.0), point(0.0, 100.0)),
        (point(0.0, 0.0), point(30.0, 40.0), point(60.0, 80.0)),
        (point(-10.0, 5.0), point(40.0, 5.0), point(90.0, 5.0)),
    ];
    for (a, p, b) in cases {
        assert!(is_point_unimportant(a, p, b, 20.0));
        assert!(is_point_unimportant(a, p, b, 1e-9));
        let data = path_point_data(&[a, p, b], RankDir::LR, &PathOptions::default());
        let handle = between(p, data[1].outgoing_control);
        let expected = (between(a, b).normalized_or_zero() * 2.0).rounded_to(2);
        assert!(approx_eq(handle.x, expected.x) && approx_eq(handle.y, expected.y));
    }
}

#[test]
fn degenerate_direction_gives_coincident_controls() {
    let pts = [point(0.0, 0.0), point(5.0, 5.0), point(0.0, 0.0)];
    let data = path_point_data(&pts, RankDir::TB, &PathOptions::default());
    assert_eq!(data[1].incoming_control, data[1].point);
    assert_eq!(data[1].outgoing_control, data[1].point);
}

#[test]
fn path_options_change_handle_lengths() {
    let opts = PathOptions {
        curve_length: 50.0,
        ..Default::default()
    };
    let data = path_point_data(&[point(0.0, 0.0), point(0.0, 100.0)], RankDir::TB, &opts);
    assert_eq!(data[0].outgoing_control, point(0.0, 50.0));
    assert_eq!(data[1].incoming_control, point(0.0, 50.0));
}

#[test]
fn triangle_points_top_to_bottom() {
    let (g, edge) = two_node_graph(
        Node::new("src", 100.0, 40.0).at(0.0, 0.0),
        Node::new("dest", 100.0, 40.0).at(0.0, 200.0),
        Vec::new(),
    );
    let s = triangle_points(&g, &edge, &layout(RankDir::TB)).unwrap();
    let nums = numbers(&s);
    let h = 10.0 * 3f64.sqrt() / 2.0;
    let expected = [-5.0, 180.0 - h, 5.0, 180.0 - h, 0.0, 180.0];
    assert_eq!(nums.len(), 6, "{s}");
    for (got, want) in nums.iter().zip(expected) {
        assert!(approx_eq(*got, printed(want)), "{s}");
    }
    assert_eq!(s.split(' ').count(), 3);
}

#[test]
fn triangle_points_follow_flow_left_to_right() {
    let (g, edge) = two_node_graph(
        Node::new("src", 100.0, 40.0).at(0.0, 0.0),
        Node::new("dest", 100.0, 40.0).at(300.0, 0.0),
        Vec::new(),
    );
    let nums = numbers(&triangle_points(&g, &edge, &layout(RankDir::LR)).unwrap());
    let h = 10.0 * 3f64.sqrt() / 2.0;
    let expected = [250.0 - h, 5.0, 250.0 - h, -5.0, 250.0, 0.0];
    for (got, want) in nums.iter().zip(expected) {
        assert!(approx_eq(*got, printed(want)), "{nums:?}");
    }
}

#[test]
fn triangle_points_fail_without_destination_position() {
    let (g, edge) = two_node_graph(
        Node::new("src", 100.0, 40.0).at(0.0, 0.0),
        Node::new("dest", 100.0, 40.0),
        Vec::new(),
    );
    let err = triangle_points(&g, &edge, &layout(RankDir::TB)).unwrap_err();
    assert!(matches!(
        err,
        Error::Core(narwhal_core::Error::MissingPosition { ref node_id }) if node_id == "dest"
    ));
    assert!(curved_path(&g, &edge, &layout(RankDir::TB)).is_err());
}
