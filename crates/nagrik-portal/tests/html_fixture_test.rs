use nagrik_portal::html::{DEFAULT_DESCRIPTION, parse_schemes_from_html};

const FIND_SCHEMES: &str = include_str!("fixtures/find_schemes.html");
const BASE: &str = "https://www.myscheme.gov.in";

#[test]
fn find_schemes_page() {
    let schemes = parse_schemes_from_html(FIND_SCHEMES, BASE, 20);
    let names: Vec<_> = schemes.iter().map(|s| s.name.as_str()).collect();

    // Links come first, then data attributes, then list items.
    assert_eq!(
        &names[..4],
        [
            "Find Schemes",
            "Pradhan Mantri Mudra Yojana",
            "Pradhan Mantri Awas Yojana - Gramin",
            "Stand-Up India",
        ]
    );
    assert_eq!(
        schemes[1].source_url.as_deref(),
        Some("https://www.myscheme.gov.in/schemes/pmmy")
    );
    assert_eq!(schemes[1].description, DEFAULT_DESCRIPTION);
    assert_eq!(
        schemes[3].description,
        "Bank loans for SC/ST and women entrepreneurs."
    );
    assert!(names.contains(&"Loans up to ₹10 lakh for non-farm micro enterprises."));
    // Short labels still pass the length filter.
    assert!(names.contains(&"PMAY-G"));

    let jan_dhan = schemes.last().unwrap();
    assert_eq!(jan_dhan.name, "Pradhan Mantri Jan Dhan Yojana");
    assert_eq!(
        jan_dhan.source_url.as_deref(),
        Some("https://www.myscheme.gov.in/schemes/pmjdy")
    );
    assert_eq!(
        jan_dhan.description,
        "Basic savings bank account for every household."
    );

    for (i, scheme) in schemes.iter().enumerate() {
        assert_eq!(scheme.id, format!("myscheme-{}", i + 1));
    }
    assert_eq!(
        names.iter().filter(|n| **n == "Pradhan Mantri Mudra Yojana").count(),
        1
    );
}

#[test]
fn cap_keeps_the_earliest_entries() {
    let schemes = parse_schemes_from_html(FIND_SCHEMES, BASE, 2);
    assert_eq!(schemes.len(), 2);
    assert_eq!(schemes[1].name, "Pradhan Mantri Mudra Yojana");
}
