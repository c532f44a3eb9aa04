use phyloview_render::export::{self, SvgOptions};
use phyloview_render::{
    compute_grid, grid_to_svg, AxisScale, DirectorySink, GridParams, GridStyle, LayoutMode, MapTiles, PanOffsets,
    PanelLayout, PanelSources,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn tree_panel() -> String {
    let x = AxisScale::linear([0.0, 0.012], [10.0, 610.0]);
    let y = AxisScale::linear([1.0, 40.0], [10.0, 410.0]);
    let grid = compute_grid(&x, &y, LayoutMode::Rect, &GridParams::default()).unwrap();
    format!(
        r#"<svg width="620" height="440">{}<g id="branches"><path d="M10 10 L 300 10"/></g></svg>"#,
        grid_to_svg(&grid, &GridStyle::default())
    )
}

fn sources() -> PanelSources {
    PanelSources {
        tree: Some(tree_panel()),
        map: Some(r#"<svg width="1" height="1" viewBox="0 0 1 1"><circle cx="5" cy="5" r="2"/></svg>"#.to_string()),
        entropy: Some(r#"<g width="900" height="120"><text x="4">HA1</text></g>"#.to_string()),
        frequencies: Some(r#"<svg width="500" height="150"><g/></svg>"#.to_string()),
    }
}

fn tiles() -> MapTiles {
    MapTiles {
        base64_map: "data:image/png;base64,iVBORw0KGgo=".to_string(),
        width: 480.0,
        height: 400.0,
        pan_offsets: PanOffsets { x: -20.0, y: 12.0 },
    }
}

#[test]
fn svg_export_is_deterministic() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let caption = vec!["Zika virus".to_string(), "Built with PhyloView".to_string()];

    let mut written = Vec::new();
    for sub in ["a", "b"] {
        let mut sink = DirectorySink::new(dir.path().join(sub)).unwrap();
        let mut provider = tiles();
        let note = export::svg(
            &mut sink,
            "zika",
            &sources(),
            Some(&mut provider),
            &caption,
            &SvgOptions::default(),
        )
        .unwrap();
        assert!(!note.is_warning(), "{}", note);
        written.push(std::fs::read(sink.path_of("zika.svg")).unwrap());
    }

    assert_eq!(written[0], written[1], "SVG bytes differ between identical exports");
}

#[test]
fn full_figure_layout() {
    init_logging();
    let mut provider = tiles();
    let mut sink = phyloview_render::MemorySink::new();
    let options = SvgOptions {
        layout: PanelLayout::Stacked,
        ..SvgOptions::default()
    };
    export::svg(&mut sink, "fig", &sources(), Some(&mut provider), &[], &options).unwrap();
    let doc = sink.content("fig.svg").unwrap();

    // stacked: tree 620x440 above map 480x400, entropy 900 wide widens the canvas
    let order: Vec<usize> = ["\"tree\"", "\"mapTiles\"", "\"mapD3\"", "\"entropy\"", "\"frequencies\""]
        .iter()
        .map(|id| doc.find(&format!("<svg id={}", id)).unwrap())
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]));

    assert!(doc.contains(r#"<svg id="mapTiles" width="480" height="400" x="50" y="540">"#));
    assert!(doc.contains(r#"<svg id="mapD3" width="480" height="400" x="30" y="552">"#));
    assert!(doc.contains(r#"<svg id="entropy" width="900" height="120" x="50" y="990">"#));
    assert!(doc.contains(r#"<svg id="frequencies" width="500" height="150" x="250" y="1160">"#));
    assert!(doc.starts_with(
        r#"<svg xmlns:xlink="http://www.w3.org/1999/xlink" xmlns="http://www.w3.org/2000/svg" width="1000" height="1380">"#
    ));
}
