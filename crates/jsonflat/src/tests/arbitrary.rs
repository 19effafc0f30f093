use alloc::{string::String, vec::Vec};

use quickcheck::{Arbitrary, Gen};

use super::utils::TestDoc;

/// A double drawn from the quarter grid.
///
/// Quarters are exact both in binary and in decimal text, so every value
/// reproduces itself bit-for-bit through a format/tokenize round trip.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct GridDouble(pub f64);

impl Arbitrary for GridDouble {
    fn arbitrary(g: &mut Gen) -> Self {
        let steps = i32::arbitrary(g) % 10_000;
        Self(f64::from(steps) * 0.25)
    }
}

impl Arbitrary for TestDoc {
    fn arbitrary(g: &mut Gen) -> Self {
        fn gen_doc(g: &mut Gen, depth: usize) -> TestDoc {
            if depth == 0 {
                match usize::arbitrary(g) % 5 {
                    0 => TestDoc::Null,
                    1 => TestDoc::Bool(bool::arbitrary(g)),
                    2 => TestDoc::Long(i64::arbitrary(g)),
                    3 => TestDoc::Double(GridDouble::arbitrary(g).0),
                    _ => TestDoc::Str(String::arbitrary(g)),
                }
            } else {
                match usize::arbitrary(g) % 7 {
                    0 => TestDoc::Null,
                    1 => TestDoc::Bool(bool::arbitrary(g)),
                    2 => TestDoc::Long(i64::arbitrary(g)),
                    3 => TestDoc::Double(GridDouble::arbitrary(g).0),
                    4 => TestDoc::Str(String::arbitrary(g)),
                    5 => {
                        let len = usize::arbitrary(g) % 4;
                        TestDoc::Array((0..len).map(|_| gen_doc(g, depth - 1)).collect())
                    }
                    _ => {
                        let len = usize::arbitrary(g) % 4;
                        TestDoc::Object(
                            (0..len)
                                .map(|_| (String::arbitrary(g), gen_doc(g, depth - 1)))
                                .collect::<Vec<_>>(),
                        )
                    }
                }
            }
        }

        let depth = usize::arbitrary(g) % 3;
        gen_doc(g, depth)
    }
}
