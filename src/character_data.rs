//! Pure string-splice primitives shared by Text, Comment, CDATASection and
//! ProcessingInstruction.
//!
//! All offsets and counts are in bytes (code units of the underlying UTF-8
//! buffer), not UTF-16 code units as WHATWG specifies — see Design Notes (a)
//! in the spec. Splitting a multi-byte sequence is undefined behavior at
//! this layer: callers (e.g. a future selector/serializer) must only pass
//! offsets on character boundaries.

use tendril::StrTendril;

use crate::error::{DomError, Result};

/// Return a new owned buffer holding `data[off .. off + min(count, len-off)]`.
pub fn substring(data: &StrTendril, off: usize, count: Option<usize>)
    -> Result<StrTendril>
{
    let len = data.len();
    check_offset(off, len)?;
    let avail = len - off;
    let take = count.map(|c| c.min(avail)).unwrap_or(avail);
    Ok(StrTendril::from_slice(&data[off..off + take]))
}

/// Concatenate `s` onto the end of `data`.
pub fn append(data: &mut StrTendril, s: &str) {
    data.push_slice(s);
}

/// Splice `s` into `data` at byte offset `off`.
pub fn insert(data: &mut StrTendril, off: usize, s: &str) -> Result<()> {
    let len = data.len();
    check_offset(off, len)?;
    let mut out = StrTendril::with_capacity((len + s.len()) as u32);
    out.push_slice(&data[..off]);
    out.push_slice(s);
    out.push_slice(&data[off..]);
    *data = out;
    Ok(())
}

/// Remove `min(count, len - off)` bytes starting at `off`.
pub fn delete(data: &mut StrTendril, off: usize, count: usize) -> Result<()> {
    let len = data.len();
    check_offset(off, len)?;
    let avail = len - off;
    let take = count.min(avail);
    let mut out = StrTendril::with_capacity((len - take) as u32);
    out.push_slice(&data[..off]);
    out.push_slice(&data[off + take..]);
    *data = out;
    Ok(())
}

/// Delete then insert, atomically: either both happen or the buffer is left
/// unchanged.
pub fn replace(data: &mut StrTendril, off: usize, count: usize, s: &str)
    -> Result<()>
{
    let len = data.len();
    check_offset(off, len)?;
    let avail = len - off;
    let take = count.min(avail);
    let mut out = StrTendril::with_capacity(
        (len - take + s.len()) as u32
    );
    out.push_slice(&data[..off]);
    out.push_slice(s);
    out.push_slice(&data[off + take..]);
    *data = out;
    Ok(())
}

#[inline]
fn check_offset(off: usize, len: usize) -> Result<()> {
    if off > len {
        Err(DomError::IndexOutOfBounds { offset: off, length: len })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::ensure_logger;

    #[test]
    fn s4_character_data_scenario() {
        ensure_logger();
        let mut data: StrTendril = " TODO".into();
        append(&mut data, " fix this");
        assert_eq!(" TODO fix this", &*data);

        insert(&mut data, 5, ":").unwrap();
        assert_eq!(" TODO: fix this", &*data);

        replace(&mut data, 6, 9, " done!").unwrap();
        assert_eq!(" TODO: done!", &*data);

        delete(&mut data, 6, 5).unwrap();
        assert_eq!(" TODO:!", &*data);
    }

    #[test]
    fn offset_past_end_errors() {
        let data: StrTendril = "abc".into();
        let err = substring(&data, 10, None).unwrap_err();
        assert_eq!(
            err,
            DomError::IndexOutOfBounds { offset: 10, length: 3 }
        );
    }

    #[test]
    fn count_is_clamped_not_erroring() {
        let data: StrTendril = "abcdef".into();
        assert_eq!("def", &*substring(&data, 3, Some(1000)).unwrap());
        let mut d2 = data.clone();
        delete(&mut d2, 2, 1000).unwrap();
        assert_eq!("ab", &*d2);
    }
}
