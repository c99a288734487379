// Tests for turning raw tables into typed records.
use chrono::NaiveDate;
use runcal::config::Config;
use runcal::model::{Country, EventKind, LinkKind};
use runcal::sheets::load_sheets;
use runcal::source::MemorySource;

const EVENT_HEADER: &[&str] = &[
    "DATE", "NAME", "NAME2", "SEO", "STATUS", "URL", "DESCRIPTION", "LOCATION", "COORDINATES",
    "REGISTRATION", "TAGS", "LINK1", "LINK2",
];

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()
}

/// All required tables with headers only, plus the given event rows.
fn source_with_events(rows: &[&[&str]]) -> MemorySource {
    let mut events: Vec<&[&str]> = vec![EVENT_HEADER];
    events.extend_from_slice(rows);
    MemorySource::new()
        .with_table("Events2025", &events)
        .with_table("Groups", &[EVENT_HEADER])
        .with_table("Shops", &[EVENT_HEADER])
        .with_table(
            "Parkrun",
            &[&["DATE", "INDEX", "RUNNERS", "TEMP", "SPECIAL", "CAFE", "RESULTS", "REPORT", "AUTHOR", "PHOTOS"]],
        )
        .with_table("Tags", &[&["TAG", "NAME", "DESCRIPTION"]])
        .with_table("Series", &[&["NAME", "DESCRIPTION", "LINK1"]])
}

#[test]
fn test_event_row_is_normalized() {
    let source = source_with_events(&[&[
        "Sa. 05.04.2025",
        "Frühlingslauf 2025|Frühjahrslauf 2025",
        "Frühlingslauf",
        "Frühlingslauf in Wissembourg",
        "",
        "https://fruehlingslauf.example.com",
        "10 km durch die Weinberge|Mit Kinderlauf",
        "Wissembourg, FR",
        "N 49.037 E 7.945",
        "https://raceresult.com/12345",
        "Trail, serie:Grenzland Cup, Straße",
        "Ausschreibung|https://fruehlingslauf.example.com/flyer.pdf",
        "Anmeldung|https://other.example.com",
    ]]);

    let data = load_sheets(&source, &Config::default(), today()).unwrap();
    assert_eq!(data.events.len(), 1);
    let e = &data.events[0];

    assert_eq!(e.kind, EventKind::Event);
    assert_eq!(e.name.orig, "Frühlingslauf 2025");
    assert_eq!(e.name_old.orig, "Frühjahrslauf 2025");
    assert_eq!(e.meta.base_name.sanitized, "fruehlingslauf");
    assert_eq!(e.meta.seo_title, "Frühlingslauf in Wissembourg");
    assert_eq!(e.time.from, NaiveDate::from_ymd_opt(2025, 4, 5));
    assert!(!e.old);
    assert_eq!(e.details, "10 km durch die Weinberge");
    assert_eq!(e.details2, "Mit Kinderlauf");

    assert_eq!(e.location.city, "Wissembourg");
    assert_eq!(e.location.country, Some(Country::France));
    assert!(e.location.has_geo());

    assert_eq!(e.raw_tags, vec!["frankreich", "strasse", "trail"]);
    assert_eq!(e.raw_series, vec!["Grenzland Cup"]);
    assert!(e.tags.is_none());

    assert_eq!(e.main_link.as_ref().unwrap().url, "https://fruehlingslauf.example.com");
    assert_eq!(e.links.len(), 2);
    assert_eq!(e.links[0].kind, LinkKind::Registration);
    assert_eq!(e.links[1].name, "Ausschreibung");
}

#[test]
fn test_status_flags() {
    let row = |name: &'static str, status: &'static str| -> [&'static str; 13] {
        ["01.06.2025", name, "", "", status, "https://x.example.com", "", "", "", "", "", "", ""]
    };
    let rows = [
        row("Abgesagt", "abgesagt"),
        row("Geschlossen", "dauerhaft geschlossen"),
        row("Spezial", "spezial"),
        row("Obsolet", "obsolete"),
        row("Entwurf", "temp"),
    ];
    let refs: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
    let data = load_sheets(&source_with_events(&refs), &Config::default(), today()).unwrap();

    let names: Vec<&str> = data.events.iter().map(|e| e.name.orig.as_str()).collect();
    assert_eq!(names, vec!["Abgesagt", "Geschlossen", "Spezial", "Obsolet"]);

    assert!(data.events[0].cancelled);
    assert_eq!(data.events[0].status, "");
    assert!(data.events[1].cancelled);
    assert_eq!(data.events[1].status, "dauerhaft geschlossen");
    assert!(data.events[2].special && data.events[2].status.is_empty());
    assert!(data.events[3].obsolete && data.events[3].status.is_empty());
}

#[test]
fn test_incomplete_rows_are_skipped() {
    let data = load_sheets(
        &source_with_events(&[
            &["", "Ohne Datum", "", "", "", "https://a.example.com"],
            &["01.06.2025", "", "", "", "", "https://b.example.com"],
            &["01.06.2025", "Ohne Link", "", "", "", ""],
            &["kein datum", "Kaputtes Datum", "", "", "", "https://c.example.com"],
            &["01.02.2025", "Vorbei", "", "", "", "https://d.example.com"],
        ]),
        &Config::default(),
        today(),
    )
    .unwrap();

    let names: Vec<&str> = data.events.iter().map(|e| e.name.orig.as_str()).collect();
    assert_eq!(names, vec!["Kaputtes Datum", "Vorbei"]);
    assert!(data.events[0].time.is_zero());
    assert_eq!(data.events[0].time.original, "kein datum");
    assert!(!data.events[0].old);
    assert!(data.events[1].old);
}

#[test]
fn test_bad_link_fails_with_context() {
    let err = load_sheets(
        &source_with_events(&[&[
            "01.06.2025", "Lauf", "", "", "", "https://a.example.com", "", "", "", "", "",
            "kein link",
        ]]),
        &Config::default(),
        today(),
    )
    .unwrap_err();
    let chain = format!("{:#}", err);
    assert!(chain.contains("parsing links of event 'Lauf'"), "{chain}");
    assert!(chain.contains("bad link: <kein link>"), "{chain}");
}

#[test]
fn test_missing_column_and_table_are_fatal() {
    let source = MemorySource::new()
        .with_table("Events2025", &[&["DATE", "NAME"], &["01.06.2025", "Lauf"]])
        .with_table("Groups", &[EVENT_HEADER])
        .with_table("Shops", &[EVENT_HEADER])
        .with_table("Parkrun", &[&["DATE"]])
        .with_table("Tags", &[&["TAG"]])
        .with_table("Series", &[&["NAME"]]);
    let chain = format!("{:#}", load_sheets(&source, &Config::default(), today()).unwrap_err());
    assert!(chain.contains("table 'Events2025', line '0'"), "{chain}");
    assert!(chain.contains("missing column 'NAME2'"), "{chain}");

    let no_groups = MemorySource::new().with_table("Events2025", &[EVENT_HEADER]);
    let err = load_sheets(&no_groups, &Config::default(), today()).unwrap_err();
    assert!(err.to_string().contains("'Groups'"));
}

#[test]
fn test_empty_table_is_fatal() {
    let source = source_with_events(&[]).with_table("Shops", &[]);
    let chain = format!("{:#}", load_sheets(&source, &Config::default(), today()).unwrap_err());
    assert!(chain.contains("got 0 rows when fetching table 'Shops'"), "{chain}");
}

#[test]
fn test_parkrun_tags_and_series_tables() {
    let source = source_with_events(&[])
        .with_table(
            "Parkrun",
            &[
                &["DATE", "INDEX", "RUNNERS", "TEMP", "SPECIAL", "CAFE", "RESULTS", "REPORT", "AUTHOR", "PHOTOS"],
                &["08.03.2025", "101", "87", "4", "", "Café", "101", "", "", ""],
                &["15.03.2025", "", "", "", "Ausfall"],
            ],
        )
        .with_table(
            "Tags",
            &[
                &["TAG", "NAME", "DESCRIPTION"],
                &["Berg Lauf", "Berglauf", "Steil"],
                &["leer", "", ""],
            ],
        )
        .with_table(
            "Series",
            &[
                &["NAME", "DESCRIPTION", "LINK1"],
                &["Kurpfalz Cup", "Acht Läufe", "Wertung|https://cup.example.com"],
            ],
        );
    let config = Config::default();
    let data = load_sheets(&source, &config, today()).unwrap();

    assert_eq!(data.parkrun.len(), 2);
    let week = &data.parkrun[0];
    assert!(week.current_week);
    assert_eq!(week.temperature, "4°C");
    assert_eq!(week.results, format!("{}101", config.parkrun_results_url));
    assert!(!data.parkrun[1].current_week);
    assert_eq!(data.parkrun[1].special, "Ausfall");

    assert_eq!(data.tags.len(), 1);
    assert_eq!(data.tags[0].name.sanitized, "berg-lauf");
    assert_eq!(data.tags[0].name.orig, "Berglauf");

    assert_eq!(data.series.len(), 1);
    assert_eq!(data.series[0].name.sanitized, "kurpfalz-cup");
    assert_eq!(data.series[0].links[0].url, "https://cup.example.com");
}
