//! Locale-aware short date formatting ("Sep 4, 1986" style) for result entries.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::types::PublishedDate;

/// Pattern tokens: `{D}` day, `{M}` month number, `{MMM}` short month name, `{YYYY}` year.
struct ShortDateStyle {
    pattern: &'static str,
    months: [&'static str; 12],
}

const NUMERIC: [&str; 12] = ["", "", "", "", "", "", "", "", "", "", "", ""];

const EN: ShortDateStyle = ShortDateStyle {
    pattern: "{MMM} {D}, {YYYY}",
    months: ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"],
};

const FR: ShortDateStyle = ShortDateStyle {
    pattern: "{D} {MMM} {YYYY}",
    months: [
        "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
        "déc.",
    ],
};

const DE: ShortDateStyle = ShortDateStyle {
    pattern: "{D}. {MMM} {YYYY}",
    months: [
        "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sep.", "Okt.", "Nov.", "Dez.",
    ],
};

const ES: ShortDateStyle = ShortDateStyle {
    pattern: "{D} de {MMM} de {YYYY}",
    months: [
        "ene.", "feb.", "mar.", "abr.", "may.", "jun.", "jul.", "ago.", "sep.", "oct.", "nov.", "dic.",
    ],
};

const IT: ShortDateStyle = ShortDateStyle {
    pattern: "{D} {MMM} {YYYY}",
    months: ["gen", "feb", "mar", "apr", "mag", "giu", "lug", "ago", "set", "ott", "nov", "dic"],
};

const PT: ShortDateStyle = ShortDateStyle {
    pattern: "{D} de {MMM} de {YYYY}",
    months: ["jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez"],
};

const NL: ShortDateStyle = ShortDateStyle {
    pattern: "{D} {MMM} {YYYY}",
    months: [
        "jan.", "feb.", "mrt.", "apr.", "mei", "jun.", "jul.", "aug.", "sep.", "okt.", "nov.", "dec.",
    ],
};

const JA_ZH: ShortDateStyle = ShortDateStyle { pattern: "{YYYY}年{M}月{D}日", months: NUMERIC };

const KO: ShortDateStyle = ShortDateStyle { pattern: "{YYYY}년 {M}월 {D}일", months: NUMERIC };

/// Primary language subtag of a locale tag: `fr-FR`, `fr_FR.UTF-8` → `fr`.
pub fn primary_language(locale: &str) -> String {
    locale
        .split(['-', '_', '.', '@'])
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

fn style_for(locale: &str) -> &'static ShortDateStyle {
    match primary_language(locale).as_str() {
        "fr" => &FR,
        "de" => &DE,
        "es" => &ES,
        "it" => &IT,
        "pt" => &PT,
        "nl" => &NL,
        "ja" | "zh" => &JA_ZH,
        "ko" => &KO,
        _ => &EN,
    }
}

/// Timestamps above this are taken as milliseconds rather than seconds.
const MILLIS_THRESHOLD: u64 = 100_000_000_000;

/// Calendar date of a recorded publication date, if it can be understood.
pub fn parse_date(date: &PublishedDate) -> Option<NaiveDate> {
    match date {
        PublishedDate::Timestamp(ts) => {
            let dt = if ts.unsigned_abs() > MILLIS_THRESHOLD {
                DateTime::from_timestamp_millis(*ts)
            } else {
                DateTime::from_timestamp(*ts, 0)
            };
            dt.map(|d| d.date_naive())
        }
        PublishedDate::Text(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.date_naive());
            }
            for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                    return Some(dt.date());
                }
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
        }
    }
}

/// Format a calendar date in the short style of `locale`; unknown locales use English.
pub fn format_short(date: NaiveDate, locale: &str) -> String {
    use chrono::Datelike;

    let style = style_for(locale);
    let month0 = date.month0() as usize;
    style
        .pattern
        .replace("{MMM}", style.months[month0])
        .replace("{M}", &date.month().to_string())
        .replace("{D}", &date.day().to_string())
        .replace("{YYYY}", &date.year().to_string())
}

/// Display string for a recorded date. Unparseable text is shown verbatim.
pub fn display_date(date: &PublishedDate, locale: &str) -> String {
    match parse_date(date) {
        Some(d) => format_short(d, locale),
        None => match date {
            PublishedDate::Text(s) => s.clone(),
            PublishedDate::Timestamp(ts) => ts.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sep4() -> NaiveDate {
        NaiveDate::from_ymd_opt(1986, 9, 4).unwrap()
    }

    #[test]
    fn short_formats_per_locale() {
        assert_eq!(format_short(sep4(), "en"), "Sep 4, 1986");
        assert_eq!(format_short(sep4(), "en-US"), "Sep 4, 1986");
        assert_eq!(format_short(sep4(), "fr-FR"), "4 sept. 1986");
        assert_eq!(format_short(sep4(), "de"), "4. Sep. 1986");
        assert_eq!(format_short(sep4(), "es"), "4 de sep. de 1986");
        assert_eq!(format_short(sep4(), "ja"), "1986年9月4日");
        assert_eq!(format_short(sep4(), "zh_CN.UTF-8"), "1986年9月4日");
    }

    #[test]
    fn unknown_locale_falls_back_to_english() {
        assert_eq!(format_short(sep4(), "tlh"), "Sep 4, 1986");
        assert_eq!(format_short(sep4(), ""), "Sep 4, 1986");
    }

    #[test]
    fn primary_language_subtag() {
        assert_eq!(primary_language("fr_FR.UTF-8"), "fr");
        assert_eq!(primary_language("PT-br"), "pt");
        assert_eq!(primary_language("C"), "c");
    }

    #[test]
    fn parses_index_date_shapes() {
        let expected = Some(NaiveDate::from_ymd_opt(2020, 3, 1).unwrap());
        assert_eq!(parse_date(&PublishedDate::Text("2020-03-01T10:00:00.000Z".into())), expected);
        assert_eq!(parse_date(&PublishedDate::Text("2020-03-01T10:00:00+02:00".into())), expected);
        assert_eq!(parse_date(&PublishedDate::Text("2020-03-01 10:00:00".into())), expected);
        assert_eq!(parse_date(&PublishedDate::Text("2020-03-01".into())), expected);
        assert_eq!(parse_date(&PublishedDate::Timestamp(1_583_056_800)), expected);
        assert_eq!(parse_date(&PublishedDate::Timestamp(1_583_056_800_000)), expected);
    }

    #[test]
    fn unparseable_date_shown_verbatim() {
        let date = PublishedDate::Text("last spring".into());
        assert_eq!(parse_date(&date), None);
        assert_eq!(display_date(&date, "en"), "last spring");
    }

    #[test]
    fn extreme_timestamps_are_shown_verbatim() {
        for ts in [i64::MIN, i64::MAX] {
            let date = PublishedDate::Timestamp(ts);
            assert_eq!(parse_date(&date), None);
            assert_eq!(display_date(&date, "en"), ts.to_string());
        }

        let hit: crate::types::SearchResult =
            serde_json::from_str(r#"{"title": "t", "date": -9223372036854775808}"#).unwrap();
        let date = hit.published_date.unwrap();
        assert_eq!(date, PublishedDate::Timestamp(i64::MIN));
        assert_eq!(display_date(&date, "fr"), "-9223372036854775808");
    }
}
