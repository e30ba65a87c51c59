//! Integration tests over tables recorded from the NIST ASD

use asdtools_nist::{
    fuse, load_levels, load_lines, parse_levels, read_binary, read_json, write_binary,
    write_json, Error, Fused, Levels, Lines, Parity, TransitionType, J_NOT_IDENTIFIED,
};
use rstest::{fixture, rstest};

#[fixture]
fn fe_levels() -> Levels {
    load_levels("./data/fe_xxiv_levels.tsv").unwrap()
}

#[fixture]
fn fe_lines() -> Lines {
    load_lines("./data/fe_xxiv_lines.tsv").unwrap()
}

#[fixture]
fn fe_fused(fe_levels: Levels, fe_lines: Lines) -> Fused {
    fuse(&fe_levels, &fe_lines).unwrap()
}

#[fixture]
fn na_levels() -> Levels {
    load_levels("./data/na_x_levels.tsv").unwrap()
}

#[fixture]
fn as_levels() -> Levels {
    load_levels("./data/as_xxxiii_levels.tsv").unwrap()
}

fn scratch(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("asdtools_{}_{name}", std::process::id()))
}

#[rstest]
#[case("./data/fe_xxiv_levels.tsv")] // case 1
#[case("./data/na_x_levels.tsv")] // case 2
#[case("./data/as_xxxiii_levels.tsv")] // case 3
fn ground_level_is_zero(#[case] path: &str) {
    let levels = load_levels(path).unwrap();
    let ground = levels.ground().unwrap();
    assert_eq!(ground.index, 0);
    assert_eq!(ground.energy, 0.0);
}

#[rstest]
#[case("./data/fe_xxiv_levels.tsv", "L7185")] // case 1
#[case("./data/na_x_levels.tsv", "L8437")] // case 2
#[case("./data/as_xxxiii_levels.tsv", "L11256")] // case 3
fn reference_is_consistent(#[case] path: &str, #[case] reference: &str) {
    let levels = load_levels(path).unwrap();
    assert_eq!(levels.reference().unwrap(), Some(reference));
    assert!(levels
        .iter()
        .all(|l| l.reference.as_deref() == Some(reference)));
}

#[rstest]
fn fe_first_excited_level(fe_levels: Levels) {
    let level = fe_levels.get(1).unwrap();
    assert_eq!(level.configuration, "1s2.2p");
    assert_eq!(level.term, "2P");
    assert_eq!(level.parity, Parity::Odd);
    assert_eq!(level.j, 0.5);
    assert!((level.energy - 48.5997).abs() < 1e-9);
    assert_eq!(level.energy_digits, Some(4));
    assert_eq!(level.energy_uncertainty, Some(0.0012));
    assert!(!level.energy_is_theoretical);
}

#[rstest]
fn fe_limit_is_not_a_level(fe_levels: Levels) {
    assert_eq!(fe_levels.ionization_limit, Some(2045.759));
    assert_eq!(fe_levels.len(), 12);
    assert!(fe_levels.iter().all(|l| l.term != "Limit"));

    // indices stay contiguous across the blank row and the limit
    for (i, level) in fe_levels.iter().enumerate() {
        assert_eq!(level.index, i);
    }

    let last = fe_levels.get(11).unwrap();
    assert_eq!(last.configuration, "1s.2s.3s");
    assert_eq!(last.energy, 7881.9);
}

#[rstest]
fn fe_last_digit_uncertainty(fe_levels: Levels) {
    let level = fe_levels.get(4).unwrap();
    assert_eq!(level.energy, 1161.92);
    assert!((level.energy_uncertainty.unwrap() - 0.12).abs() < 1e-12);
}

#[rstest]
fn na_has_every_4f_triplet(na_levels: Levels) {
    for j in [2.0, 3.0, 4.0] {
        let found = na_levels.find("1s.4f", "3F", j);
        assert!(!found.is_empty(), "no 1s.4f 3F level with J = {j}");
        assert!(found.iter().all(|l| l.parity == Parity::Odd));
        assert_eq!(found[0].degeneracy(), Some((2.0 * j) as u32 + 1));
    }

    // duplicated J = 3 is kept, not collapsed
    assert_eq!(na_levels.find("1s.4f", "3F", 3.0).len(), 2);
}

#[rstest]
fn na_4f_triplet_doubled_j(na_levels: Levels) {
    let mut two_j = na_levels
        .iter()
        .filter(|l| l.configuration == "1s.4f" && l.term == "3F")
        .filter_map(|l| l.two_j())
        .collect::<Vec<u32>>();
    two_j.dedup();
    assert_eq!(two_j, vec![4, 6, 8]);
}

#[rstest]
fn fe_doubled_j(fe_levels: Levels, fe_lines: Lines) {
    assert_eq!(fe_levels.get(0).unwrap().two_j(), Some(1));
    assert_eq!(fe_levels.get(2).unwrap().two_j(), Some(3));

    let line = fe_lines.get(1).unwrap();
    assert_eq!(line.lower.two_j(), Some(3));
    assert_eq!(line.upper.two_j(), Some(5));
}

#[rstest]
fn na_unidentified_levels(na_levels: Levels) {
    let no_term = na_levels
        .iter()
        .find(|l| l.configuration == "1s.5f")
        .unwrap();
    assert_eq!(no_term.j, J_NOT_IDENTIFIED);
    assert_eq!(no_term.parity, Parity::Odd);
    assert!(no_term.energy_is_uncertain);

    // a list of possible J values is not an identification
    let several = na_levels
        .iter()
        .find(|l| l.configuration == "1s.5g")
        .unwrap();
    assert!(!several.is_j_identified());
    assert_eq!(several.parity, Parity::Even);
}

#[rstest]
fn as_theoretical_levels(as_levels: Levels) {
    assert!(!as_levels.get(0).unwrap().energy_is_theoretical);
    assert!(as_levels.get(1).unwrap().energy_is_theoretical);
    assert!(as_levels
        .iter()
        .skip(1)
        .all(|l| l.energy_is_theoretical));
    assert_eq!(as_levels.ionization_limit, Some(18498.18));
}

#[rstest]
fn fe_lines_decoded(fe_lines: Lines) {
    assert_eq!(fe_lines.len(), 6);

    let m1 = fe_lines.get(5).unwrap();
    assert_eq!(m1.transition_type, TransitionType::M1);
    assert!(m1.observed_wavelength.uncertain);
    assert_eq!(m1.wavelength(), Some(77.5));

    let fik_only = fe_lines.get(1).unwrap();
    assert_eq!(fik_only.aki, None);
    assert_eq!(fik_only.fik, Some(0.643));
    assert_eq!(fik_only.g_lower, Some(4));
    assert_eq!(fik_only.g_upper, Some(6));

    // no observed wavelength, falls back to Ritz
    assert_eq!(fe_lines.get(2).unwrap().wavelength(), Some(1.28));
}

#[rstest]
fn fe_fused_has_strengths(fe_fused: Fused) {
    assert_eq!(fe_fused.len(), 6);
    assert!(fe_fused.count_aki() > 0);
    assert!(fe_fused.count_fik() > 0);
    assert!(fe_fused.count_strength() > 0);

    // line order is preserved
    for (i, line) in fe_fused.iter().enumerate() {
        assert_eq!(line.line.index, i);
    }
}

#[rstest]
fn fe_fused_strength_agrees_with_gf(fe_fused: Fused) {
    // 2s 2S1/2 - 2p 2P3/2 has both Aki and fik
    let line = fe_fused.lines.get(3).unwrap();
    assert_eq!(line.upper.selected, Some(2));
    assert_eq!(line.lower.selected, Some(0));

    let wavelength = line.wavelength.unwrap();
    assert!((wavelength - 191.9328).abs() < 1e-3);

    // E1 relation S = g_i f λ / 303.76
    let from_gf = 2.0 * 0.078 * wavelength / 303.76;
    let s = line.strength.unwrap();
    assert!((s - from_gf).abs() / from_gf < 0.01);
}

#[rstest]
fn fe_fused_strength_from_fik(fe_fused: Fused) {
    let line = fe_fused.lines.get(1).unwrap();
    assert_eq!(line.aki(), None);
    assert_eq!(line.g_lower, Some(4));
    assert_eq!(line.g_upper, Some(6));

    let from_gf = 4.0 * 0.643 * line.wavelength.unwrap() / 303.76;
    assert!((line.strength.unwrap() - from_gf).abs() / from_gf < 1e-3);
}

#[rstest]
fn fe_fused_unresolved_kept(fe_fused: Fused) {
    let line = fe_fused.lines.get(2).unwrap();
    assert!(!line.upper.is_resolved());
    assert!(line.lower.is_resolved());
    assert_eq!(line.upper_energy, None);
    assert_eq!(line.wavelength, None);
    assert_eq!(line.strength, None);
}

#[rstest]
fn fe_fused_magnetic_dipole(fe_fused: Fused) {
    let line = fe_fused.lines.get(5).unwrap();
    let wavelength = line.wavelength.unwrap();
    let expected = 1.43e4 * 4.0 * wavelength.powi(3) / 2.69735e13;
    assert!((line.strength.unwrap() - expected).abs() / expected < 1e-9);
    assert_eq!(fe_fused.level(&line.upper).unwrap().j, 1.5);
}

#[rstest]
fn html_is_not_found() {
    let result = load_levels("./data/no_data.html");
    match result {
        Err(Error::DataNotFound { spectrum, .. }) => assert!(spectrum.contains("no_data.html")),
        other => panic!("expected no data, got {other:?}"),
    }
    assert!(load_lines("./data/no_data.html").is_err_and(|e| e.is_not_found()));
}

#[rstest]
fn query_error_page_is_not_no_data() {
    let page = "<html><body><p>Error: Unrecognized token.</p></body></html>";
    let result = parse_levels(page);
    assert!(matches!(result, Err(Error::ParseError(_))));
    assert!(!result.is_err_and(|e| e.is_not_found()));
}

#[rstest]
fn quoted_headers_keep_data() {
    let text = std::fs::read_to_string("./data/fe_xxiv_levels.tsv").unwrap();
    let (header, rows) = text.split_once('\n').unwrap();
    let quoted = header
        .split('\t')
        .map(|h| format!("\"{h}\""))
        .collect::<Vec<_>>()
        .join("\t");

    let levels = parse_levels(&format!("{quoted}\n{rows}")).unwrap();
    assert_eq!(levels.len(), 12);
    assert_eq!(levels.get(1).unwrap().configuration, "1s2.2p");
    assert_eq!(levels.ionization_limit, Some(2045.759));
}

#[rstest]
fn truncated_table_is_parse_error() {
    let text = std::fs::read_to_string("./data/fe_xxiv_levels.tsv").unwrap();
    let truncated = text.trim_end().rsplit_once('\t').unwrap().0;
    let result = parse_levels(truncated);
    assert!(matches!(result, Err(Error::ParseError(_))));
}

#[rstest]
fn json_round_trip(fe_fused: Fused) {
    let path = scratch("fused.json");
    write_json(&fe_fused, &path).unwrap();
    let reloaded: Fused = read_json(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let close = |a: Option<f64>, b: Option<f64>| match (a, b) {
        (Some(a), Some(b)) => (a - b).abs() <= 1e-12 * a.abs().max(1.0),
        (None, None) => true,
        _ => false,
    };

    // nulls stay in place
    assert_eq!(fe_fused.len(), reloaded.len());
    for (a, b) in fe_fused.iter().zip(reloaded.iter()) {
        assert!(close(a.line.aki, b.line.aki));
        assert!(close(a.line.fik, b.line.fik));
        assert!(close(a.strength, b.strength));
        assert_eq!(a.upper, b.upper);
        assert_eq!(a.line.transition_type, b.line.transition_type);
    }

    assert_eq!(fe_fused.levels.len(), reloaded.levels.len());
    for (a, b) in fe_fused.levels.iter().zip(reloaded.levels.iter()) {
        assert_eq!(a.index, b.index);
        assert_eq!(a.term, b.term);
        assert!(close(Some(a.energy), Some(b.energy)));
        assert!(close(a.energy_uncertainty, b.energy_uncertainty));
    }
}

#[rstest]
fn binary_round_trip(na_levels: Levels, fe_fused: Fused) {
    let path = scratch("levels.bin");
    write_binary(&na_levels, &path).unwrap();
    let reloaded: Levels = read_binary(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(na_levels, reloaded);

    let path = scratch("fused.bin");
    write_binary(&fe_fused, &path).unwrap();
    let reloaded: Fused = read_binary(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(fe_fused, reloaded);
}
