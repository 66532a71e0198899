/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Reserved marker bytes and the escaping transform.

Every value in the canonical stream is delimited by [`BEGIN`] and [`END`].
Payload bytes that collide with a marker are prefixed with [`ESCAPE`], so
that the structure of the stream can always be recovered by scanning for
unescaped markers.

*/

use std::borrow::Cow;

/// Opens a value envelope.
pub const BEGIN: u8 = 0x0B;
/// Closes a value envelope.
pub const END: u8 = 0x0E;
/// Prefixes payload bytes equal to one of the three markers.
pub const ESCAPE: u8 = 0x0C;

#[inline(always)]
fn is_marker(byte: u8) -> bool {
    byte == BEGIN || byte == END || byte == ESCAPE
}

/// Escape `bytes` for inclusion in the canonical stream.
///
/// The input is returned borrowed if it contains no marker byte. Escaping must
/// be applied exactly once, right before the bytes are written.
///
/// ```
/// use ionhash::markers::escape;
/// assert_eq!(&*escape(&[0x01, 0x02]), &[0x01, 0x02]);
/// assert_eq!(&*escape(&[0x0B, 0x0C]), &[0x0C, 0x0B, 0x0C, 0x0C]);
/// ```
pub fn escape(bytes: &[u8]) -> Cow<'_, [u8]> {
    let markers = bytes.iter().filter(|&&b| is_marker(b)).count();
    if markers == 0 {
        return Cow::Borrowed(bytes);
    }
    let mut escaped = Vec::with_capacity(bytes.len() + markers);
    for &byte in bytes {
        if is_marker(byte) {
            escaped.push(ESCAPE);
        }
        escaped.push(byte);
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_borrows_clean_input() {
        let data = [0x00, 0x0A, 0x0D, 0x0F, 0xFF];
        assert!(matches!(escape(&data), Cow::Borrowed(_)));
        assert!(matches!(escape(&[]), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_every_marker() {
        assert_eq!(
            escape(&[BEGIN, 0x01, END, ESCAPE]).into_owned(),
            vec![ESCAPE, BEGIN, 0x01, ESCAPE, END, ESCAPE, ESCAPE]
        );
    }
}
