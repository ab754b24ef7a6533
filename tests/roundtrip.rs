//! Encode → decode over the whole value range, plus the structural
//! properties of the glyph table as it is drawn.

mod common;

use std::collections::HashSet;
use std::thread;

use cistercian::codec::table::{self, Role};
use cistercian::codec::{decode, encode, CodecError, Frame, Numeral, RangeError, MAX_VALUE};

use common::dynamic;

#[test]
fn every_value_round_trips() {
    let workers = thread::available_parallelism().map_or(4, |n| n.get()) as i64;
    let total = i64::from(MAX_VALUE) + 1;
    let chunk = (total + workers - 1) / workers;

    let failures: Vec<(i64, String)> = thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|w| {
                s.spawn(move || {
                    let mut bad = Vec::new();
                    for n in (w * chunk)..((w + 1) * chunk).min(total) {
                        let img = dynamic(encode(n, false).unwrap().image);
                        match decode(&img) {
                            Ok(v) if i64::from(v) == n => {}
                            Ok(v) => bad.push((n, format!("decoded as {}", v))),
                            Err(e) => bad.push((n, e.to_string())),
                        }
                    }
                    bad
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    assert!(failures.is_empty(), "round trip failed for {:?}", &failures[..failures.len().min(10)]);
}

#[test]
fn range_is_enforced() {
    for n in [-1, 10_000, i64::MIN, i64::MAX] {
        match encode(n, false) {
            Err(CodecError::Range(RangeError::OutOfRange(v))) => assert_eq!(v, n),
            other => panic!("{} should be out of range, got {:?}", n, other.map(|r| r.numeral)),
        }
    }
    assert!(encode(0, false).is_ok());
    assert!(encode(9999, false).is_ok());
    assert!(matches!(
        "12a".parse::<Numeral>(),
        Err(RangeError::NotNumeric(_))
    ));
}

#[test]
fn each_role_is_a_bijection() {
    for role in Role::ALL {
        let mut seen = HashSet::new();
        for digit in 0..=9u8 {
            let value = i64::from(digit) * i64::from(role.place_value());
            let glyph = table::glyph(digit).unwrap();
            assert!(seen.insert(glyph), "{} digit {} repeats a glyph", role, digit);
            assert_eq!(table::digit_for(glyph), Some(digit));

            let img = dynamic(encode(value, false).unwrap().image);
            assert_eq!(i64::from(decode(&img).unwrap()), value, "{} digit {}", role, digit);
        }
    }
}

fn endpoints(n: i64) -> Vec<((i32, i32), (i32, i32))> {
    encode(n, true)
        .unwrap()
        .segments
        .unwrap()
        .iter()
        .map(|s| {
            let (a, b) = (s.start.rounded(), s.end.rounded());
            if a <= b { (a, b) } else { (b, a) }
        })
        .collect()
}

#[test]
fn roles_never_share_a_segment() {
    for (i, a) in Role::ALL.iter().enumerate() {
        for b in &Role::ALL[i + 1..] {
            for da in 1..=9i64 {
                let left = endpoints(da * i64::from(a.place_value()));
                for db in 1..=9i64 {
                    let right = endpoints(db * i64::from(b.place_value()));
                    for seg in &left {
                        assert!(
                            !right.contains(seg),
                            "{} {} and {} {} share {:?}",
                            a, da, b, db, seg
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn encoding_is_idempotent() {
    for n in [0, 7, 1234, 5050, 9999] {
        let a = encode(n, true).unwrap();
        let b = encode(n, true).unwrap();
        assert_eq!(a.image.as_raw(), b.image.as_raw());
        assert_eq!(a.segments, b.segments);
    }
}

#[test]
fn segment_list_matches_nonzero_digits() {
    let frame = Frame::canonical();
    for n in [0i64, 5, 60, 700, 8000, 1030, 9999] {
        let numeral = Numeral::new(n).unwrap();
        let segments = encode(n, true).unwrap().segments.unwrap();

        let expected: usize = numeral
            .digits()
            .iter()
            .map(|(_, d)| table::glyph(*d).unwrap().len())
            .sum();
        assert_eq!(segments.len(), expected, "{}", n);

        for seg in &segments {
            assert_ne!(numeral.digit(seg.role), 0, "{} lists a zero digit", n);
            assert!(table::glyph(numeral.digit(seg.role)).unwrap().contains(seg.stroke));
            assert_eq!(*seg, frame.segment(seg.role, seg.stroke));
        }
    }
    assert!(encode(1234, false).unwrap().segments.is_none());
}
