use phyloview_core::export::collect_attribute_names;
use phyloview_core::*;

fn zika_tree() -> TreeNode {
    serde_json::from_str(
        r#"{
          "strain": "NODE_0",
          "attr": {"div": 0.0, "num_date": 2013.2},
          "children": [
            {
              "strain": "NODE_1",
              "attr": {"div": 0.001, "num_date": 2014.0},
              "children": [
                {"strain": "BRA/2016/FC_6706", "attr": {
                  "div": 0.0025, "num_date": 2016.1, "country": "brazil",
                  "authors": "Faria et al", "accession": "KY785433",
                  "url": "https_www.ncbi.nlm.nih.gov/nuccore/KY785433",
                  "clade_membership": "clade_1"
                }},
                {"strain": "COL/FLR_00024/2015", "attr": {
                  "div": 0.003, "num_date": 2015.9, "country": "colombia",
                  "cTiter_entropy": 0.2
                }}
              ]
            },
            {"strain": "USVI/19/2016", "attr": {
              "div": 0.004, "num_date": 2016.7, "country": "usvi", "authors": "Black et al"
            }}
          ]
        }"#,
    )
    .expect("tree json")
}

#[test]
fn test_tree_traversal() {
    let tree = zika_tree();
    let strains: Vec<&str> = tree.iter().map(|n| n.strain.as_str()).collect();
    assert_eq!(
        strains,
        vec!["NODE_0", "NODE_1", "BRA/2016/FC_6706", "COL/FLR_00024/2015", "USVI/19/2016"]
    );
    assert_eq!(tree.tips().count(), 3);
}

#[test]
fn test_newick_from_json_tree() {
    let tree = zika_tree();
    let newick = to_newick(&tree, DistanceMeasure::Divergence).unwrap();
    assert!(newick.starts_with("((BRA/2016/FC_6706:"));
    assert!(newick.ends_with(")NODE_0;"));
    assert_eq!(newick.matches(':').count(), 4);

    let timetree = to_newick(&tree, DistanceMeasure::NumDate).unwrap();
    assert!(timetree.contains(")NODE_1:"));
}

#[test]
fn test_strain_table_from_json_tree() {
    let tree = zika_tree();
    let nodes = tree.nodes();
    let attrs = collect_attribute_names(&nodes);
    let table = strain_table(&nodes, &attrs);
    let rows: Vec<Vec<&str>> = table.lines().map(|l| l.split('\t').collect()).collect();

    let header = &rows[0];
    assert_eq!(header[0], "Strain");
    assert_eq!(header[1], "Accession");
    assert!(header.contains(&"Clade Membership"));
    assert!(header.contains(&"Num Date"));
    assert!(!header.iter().any(|h| h.contains("Entropy") || *h == "Div"));

    assert_eq!(rows.len(), 4);
    let bra = &rows[1];
    assert_eq!(bra[0], "BRA/2016/FC_6706");
    assert_eq!(bra[1], "Ky785433");
    assert_eq!(bra[4], "Brazil");
    assert_eq!(bra[9], "https:www.ncbi.nlm.nih.gov/nuccore/KY785433");

    let usvi = &rows[3];
    assert_eq!(usvi[4], "USVI");
    assert_eq!(usvi[1], "unknown");
}

#[test]
fn test_author_table_from_json_metadata() {
    let tree = zika_tree();
    let metadata: Metadata = serde_json::from_str(
        r#"{"author_info": {
            "Faria et al": {"n": 12, "title": "Establishment and cryptic transmission of Zika virus", "journal": "Nature", "paper_url": "https://doi.org/10.1038/nature22401"},
            "Black et al": {"title": "", "paper_url": "?"},
            "Grubaugh et al": {"n": 3}
        }}"#,
    )
    .unwrap();

    let table = author_table(&metadata, &tree.nodes());
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[1],
        "Faria et al\t12\tEstablishment And Cryptic Transmission Of Zika Virus\tNature\thttps://doi.org/10.1038/nature22401\tBRA/2016/FC_6706"
    );
    assert_eq!(lines[2], "Black et al\t1\t\t\tunknown\tUSVI/19/2016");
    assert_eq!(lines[3], "Grubaugh et al\t3\t\t\tunknown\t");
}

#[test]
fn test_scale_roundtrip() {
    let scale = AxisScale::linear([2013.0, 2017.0], [10.0, 810.0]);
    assert_eq!(scale.apply(2015.0), 410.0);
    assert_eq!(scale.invert(410.0), 2015.0);
}

#[test]
fn test_dataset_options() {
    let available = vec![
        vec!["zika".to_string()],
        vec!["flu".to_string(), "h3n2".to_string()],
        vec!["flu".to_string(), "vic".to_string()],
    ];
    let selected = vec!["flu".to_string(), "vic".to_string()];
    let opts = dataset_options(&available, &selected);
    assert_eq!(opts, vec![vec!["zika", "flu"], vec!["h3n2", "vic"]]);
}

#[test]
fn test_branch_colors() {
    let tips = [
        "#4C90C0".parse::<Rgb>().unwrap(),
        "#CBB742".parse::<Rgb>().unwrap(),
    ];
    let strokes = color::branch_stroke_colors(&tips, None);
    assert_eq!(strokes.len(), 2);
    let avg = color::average_colors(&["#000000", "#ffffff"]).unwrap();
    assert_eq!(avg.to_hex(), "#808080");
}
