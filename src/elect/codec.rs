//! Line-oriented record formats for the five flat files.
//!
//! Parsing is deliberately lenient: a line that does not match its record
//! shape is skipped and the rest of the file is still processed, so a
//! partially corrupt file loads whatever is readable instead of failing.
//! Encoding does no escaping; the registration layer keeps whitespace and
//! the `|` delimiter out of field values.

use log::debug;

use crate::elect::models::*;

/// Parses `<username> <password> <role_int>`.
pub fn parse_account(line: &str) -> Option<Account> {
    let mut parts = line.split_whitespace();
    let username = parts.next()?;
    let password = parts.next()?;
    let role = parts.next()?.parse::<u8>().ok().and_then(Role::from_wire)?;
    if parts.next().is_some() {
        return None;
    }
    Some(Account {
        username: username.to_string(),
        password: password.to_string(),
        role,
    })
}

pub fn encode_account(a: &Account) -> String {
    format!("{} {} {}", a.username, a.password, a.role.as_wire())
}

/// Parses `<rep_username>|<text>`. The text may contain spaces.
pub fn parse_manifesto(line: &str) -> Option<Manifesto> {
    let (rep_username, text) = line.split_once('|')?;
    Some(Manifesto {
        rep_username: rep_username.to_string(),
        text: ManifestoText::from_raw(text),
    })
}

pub fn encode_manifesto(m: &Manifesto) -> String {
    format!("{}|{}", m.rep_username, m.text.as_raw())
}

/// Parses `<student_username> <rep_username>`.
pub fn parse_vote(line: &str) -> Option<Vote> {
    let mut parts = line.split_whitespace();
    let student_username = parts.next()?;
    let rep_username = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Vote {
        student_username: student_username.to_string(),
        rep_username: rep_username.to_string(),
    })
}

pub fn encode_vote(v: &Vote) -> String {
    format!("{} {}", v.student_username, v.rep_username)
}

/// Parses `<rep_username> <vote_count>`.
pub fn parse_result(line: &str) -> Option<ResultEntry> {
    let mut parts = line.split_whitespace();
    let rep_username = parts.next()?;
    let vote_count = parts.next()?.parse::<u32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(ResultEntry {
        rep_username: rep_username.to_string(),
        vote_count,
    })
}

pub fn encode_result(r: &ResultEntry) -> String {
    format!("{} {}", r.rep_username, r.vote_count)
}

/// Decodes a whole file, skipping lines that do not parse.
pub fn parse_collection<T>(contents: &str, parse: fn(&str) -> Option<T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for line in contents.lines() {
        match parse(line) {
            Some(x) => out.push(x),
            None => {
                if !line.trim().is_empty() {
                    debug!("Skipping malformed line: {:?}", line);
                }
            }
        }
    }
    out
}

/// Encodes a whole collection, one record per line, trailing newline included.
pub fn encode_collection<T>(items: &[T], encode: fn(&T) -> String) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(&encode(item));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_line_round_trip() {
        let a = Account {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
            role: Role::Representative,
        };
        let line = encode_account(&a);
        assert_eq!(line, "alice hunter2 1");
        assert_eq!(parse_account(&line), Some(a));
    }

    #[test]
    fn account_bad_lines_are_rejected() {
        assert_eq!(parse_account("alice hunter2"), None);
        assert_eq!(parse_account("alice hunter2 9"), None);
        assert_eq!(parse_account("alice hunter2 x"), None);
        assert_eq!(parse_account("alice hunter2 1 extra"), None);
        assert_eq!(parse_account(""), None);
    }

    #[test]
    fn manifesto_keeps_spaces_and_maps_the_sentinel() {
        let m = parse_manifesto("bob|I will fix the coffee machine").unwrap();
        assert_eq!(m.rep_username, "bob");
        assert_eq!(
            m.text,
            ManifestoText::Submitted("I will fix the coffee machine".to_string())
        );

        let pending = parse_manifesto("carol|Not yet submitted").unwrap();
        assert!(pending.text.is_pending());
        assert_eq!(encode_manifesto(&pending), "carol|Not yet submitted");
    }

    #[test]
    fn manifesto_without_delimiter_is_skipped() {
        assert_eq!(parse_manifesto("no delimiter here"), None);
        let contents = "alice|A manifesto\nno delimiter here\nbob|Another one\n";
        let loaded = parse_collection(contents, parse_manifesto);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].rep_username, "alice");
        assert_eq!(loaded[1].rep_username, "bob");
    }

    #[test]
    fn vote_and_result_lines() {
        let v = parse_vote("s1 alice").unwrap();
        assert_eq!(encode_vote(&v), "s1 alice");
        assert_eq!(parse_vote("s1"), None);
        assert_eq!(parse_vote("s1 alice bob"), None);

        let r = parse_result("alice 12").unwrap();
        assert_eq!(r.vote_count, 12);
        assert_eq!(encode_result(&r), "alice 12");
        assert_eq!(parse_result("alice twelve"), None);
        assert_eq!(parse_result("alice -1"), None);
    }

    #[test]
    fn collection_round_trip_with_blank_lines() {
        let accounts = vec![
            default_admin(),
            Account {
                username: "dora".to_string(),
                password: "pass123".to_string(),
                role: Role::Student,
            },
        ];
        let encoded = encode_collection(&accounts, encode_account);
        let with_noise = format!("{}\n   \n", encoded);
        assert_eq!(parse_collection(&with_noise, parse_account), accounts);
    }
}
