// End-to-end derivation of the event graph from in-memory tables.
use chrono::NaiveDate;
use runcal::config::Config;
use runcal::fetch_data;
use runcal::model::link::REGISTRATION_WITH_RESULTS;
use runcal::model::EventId;
use runcal::pipeline::Data;
use runcal::source::MemorySource;

const EVENT_HEADER: &[&str] = &[
    "DATE", "NAME", "NAME2", "SEO", "STATUS", "URL", "DESCRIPTION", "LOCATION", "COORDINATES",
    "REGISTRATION", "TAGS", "LINK1",
];

fn row(
    date: &'static str,
    name: &'static str,
    name2: &'static str,
    status: &'static str,
    tags: &'static str,
    coordinates: &'static str,
    registration: &'static str,
) -> Vec<&'static str> {
    vec![
        date, name, name2, "", status, "https://lauf.example.com", "", "Heidelberg", coordinates,
        registration, tags, "",
    ]
}

fn source() -> MemorySource {
    let events = [
        row("14.01.2024", "Winterlauf 2024", "Winterlauf", "", "Trail", "N 49.41 E 8.69", "https://my.raceresult.com/1"),
        row("01.06.2024", "Alter Lauf", "", "obsolete", "", "", ""),
        row("12.01.2025", "Winterlauf 2025", "Winterlauf", "", "Trail, serie:Kurpfalz Cup", "", ""),
        row("15.03.2025", "Stadtlauf 2025", "", "", "Straße", "N 49.40 E 8.69", ""),
        row("01.06.2025", "Sommerlauf 2025", "", "", "serie:Kurpfalz Cup", "49.405, 8.70", ""),
    ];
    let groups = [
        row("", "Lauftreff Altstadt", "", "", "Treff", "", ""),
        row("", "Lauftreff Bahnstadt", "", "", "Treff", "", ""),
    ];
    let shops = [row("", "Laufladen", "", "", "Straße", "", "")];

    let table = |rows: &[Vec<&'static str>]| -> Vec<Vec<String>> {
        std::iter::once(EVENT_HEADER.to_vec())
            .chain(rows.iter().cloned())
            .map(|r| r.into_iter().map(str::to_string).collect())
            .collect()
    };

    let mut source = MemorySource::new();
    source.add_table("Events2024", table(&events[..2]));
    source.add_table("Events2025", table(&events[2..]));
    source.add_table("Groups", table(&groups));
    source.add_table("Shops", table(&shops));
    source
        .with_table(
            "Parkrun",
            &[&["DATE", "INDEX", "RUNNERS", "TEMP", "SPECIAL", "CAFE", "RESULTS", "REPORT", "AUTHOR", "PHOTOS"]],
        )
        .with_table("Tags", &[&["TAG", "NAME", "DESCRIPTION"], &["trail", "Trail", "Über Stock und Stein"]])
        .with_table("Series", &[&["NAME", "DESCRIPTION"], &["Kurpfalz Cup", "Acht Läufe"]])
        .with_table("Notizen ignore", &[])
}

fn derive() -> Data {
    let today = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
    fetch_data(&source(), &Config::default(), today).expect("pipeline should succeed")
}

fn find(data: &Data, name: &str) -> EventId {
    data.store
        .iter()
        .find(|(_, e)| e.name.orig == name)
        .map(|(id, _)| id)
        .unwrap_or_else(|| panic!("no event '{name}'"))
}

fn names(data: &Data, ids: &[EventId]) -> Vec<String> {
    ids.iter().map(|id| data.event(*id).name.orig.clone()).collect()
}

#[test]
fn test_lists_and_separators() {
    let data = derive();

    assert_eq!(
        names(&data, &data.events),
        vec!["März 2025", "Stadtlauf 2025", "April 2025", "Mai 2025", "Juni 2025", "Sommerlauf 2025"]
    );
    assert_eq!(data.store.non_separators(&data.events), 2);

    let old: Vec<String> = names(&data, &data.events_old)
        .into_iter()
        .filter(|n| n.contains("lauf"))
        .collect();
    assert_eq!(old, vec!["Winterlauf 2025", "Winterlauf 2024"]);
    assert_eq!(data.event(data.events_old[0]).name.orig, "Januar 2025");

    assert_eq!(names(&data, &data.events_obsolete), vec!["Alter Lauf"]);
    assert_eq!(names(&data, &data.groups), vec!["Lauftreff Altstadt", "Lauftreff Bahnstadt"]);
    assert_eq!(names(&data, &data.shops), vec!["Laufladen"]);

    let years: Vec<&str> = data.old_events.iter().map(|y| y.year.as_str()).collect();
    assert_eq!(years, vec!["2025", "2024"]);
    assert_eq!(
        names(&data, &data.old_events[1].events),
        vec!["Januar 2024", "Winterlauf 2024"]
    );
}

#[test]
fn test_families_chains_and_links() {
    let data = derive();
    let w24 = find(&data, "Winterlauf 2024");
    let w25 = find(&data, "Winterlauf 2025");

    assert!(data.event(w25).meta.current);
    assert!(!data.event(w24).meta.current);
    assert_eq!(data.event(w24).meta.siblings, vec![w25, w24]);
    assert_eq!(data.event(w25).slug(), "event/winterlauf/");
    assert_eq!(data.event(w24).slug(), "event/2024-winterlauf-2024.html");

    assert_eq!(data.event(w24).next, Some(w25));
    assert_eq!(data.event(w25).prev, Some(w24));

    assert_eq!(data.event(w24).links[0].name, REGISTRATION_WITH_RESULTS);
}

#[test]
fn test_near_events() {
    let data = derive();
    let stadt = find(&data, "Stadtlauf 2025");
    let sommer = find(&data, "Sommerlauf 2025");
    let w24 = find(&data, "Winterlauf 2024");

    assert_eq!(data.event(stadt).upcoming_near, vec![sommer]);
    assert_eq!(data.event(sommer).upcoming_near, vec![stadt]);
    assert_eq!(data.event(w24).upcoming_near, vec![stadt, sommer]);
}

#[test]
fn test_tags_and_series() {
    let data = derive();

    let tags: Vec<(&str, &str)> = data
        .tags()
        .map(|t| (t.name.sanitized.as_str(), t.name.orig.as_str()))
        .collect();
    assert_eq!(tags, vec![("strasse", "strasse"), ("trail", "Trail"), ("treff", "treff")]);

    let trail = data.tags().find(|t| t.name.sanitized == "trail").unwrap();
    assert_eq!(trail.backlinks.num_events(&data.store), 0);
    assert_eq!(trail.backlinks.num_old_events(&data.store), 2);

    let strasse = data.tags().find(|t| t.name.sanitized == "strasse").unwrap();
    assert_eq!(strasse.backlinks.num_events(&data.store), 1);
    assert_eq!(strasse.backlinks.num_shops(&data.store), 1);

    let series: Vec<&str> = data.series().map(|s| s.name.orig.as_str()).collect();
    assert_eq!(series, vec!["Kurpfalz Cup"]);
    assert_eq!(data.series_old().count(), 0);
    let cup = data.series().next().unwrap();
    assert_eq!(cup.backlinks.total(&data.store), 2);

    for (_, e) in data.store.iter().filter(|(_, e)| !e.obsolete) {
        assert_eq!(e.is_separator(), e.tags.is_none(), "'{}'", e.name.orig);
    }
}

#[test]
fn test_link_check_urls_and_json() {
    let data = derive();
    let urls = data.check_urls();
    assert_eq!(urls.len(), 2);
    assert!(urls.iter().all(|u| u.url == "https://lauf.example.com"));

    let json = serde_json::to_value(&data).unwrap();
    assert!(json["events"].is_array());
    assert_eq!(json["store"]["events"].as_array().unwrap().len(), data.store.len());
}
