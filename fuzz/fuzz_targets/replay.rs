#![no_main]

use libfuzzer_sys::fuzz_target;
use rewindrs::{ByteSource, ReadStatus, RewindError, RewindableReader};

/// Source whose chunking and stalls are driven by the fuzzer input.
struct FuzzSource<'a> {
    data: &'a [u8],
    pos: usize,
    pattern: &'a [u8],
    calls: usize,
}

impl ByteSource for FuzzSource<'_> {
    fn read(&mut self, dst: &mut [u8]) -> Result<ReadStatus, RewindError> {
        let step = self.pattern.get(self.calls % self.pattern.len().max(1)).copied();
        self.calls += 1;
        if self.pos == self.data.len() {
            return Ok(ReadStatus::Eof);
        }
        let chunk = match step {
            Some(0) => return Ok(ReadStatus::Read(0)),
            Some(n) => n as usize,
            None => usize::MAX,
        };
        let n = dst.len().min(chunk).min(self.data.len() - self.pos);
        dst[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(ReadStatus::Read(n))
    }

    fn close(&mut self) -> Result<(), RewindError> {
        Ok(())
    }

    fn is_open(&self) -> bool {
        true
    }
}

fuzz_target!(|input: (Vec<u8>, Vec<u8>, Vec<u8>)| {
    let (data, pattern, ops) = input;
    let mut reader = RewindableReader::new(FuzzSource {
        data: &data,
        pos: 0,
        pattern: &pattern,
        calls: 0,
    });

    // Bytes delivered since retention began; rewinding restarts this pass.
    let mut pass = Vec::new();
    let mut fetched = 0usize;
    let mut buf = [0u8; 256];

    for op in ops {
        match op % 8 {
            0 if reader.is_rewindable() => {
                reader.rewind().unwrap();
                pass.clear();
            }
            1 => {
                if reader.is_rewindable() {
                    // Everything delivered before this point can no longer be replayed.
                    fetched += pass.len();
                    pass.clear();
                }
                reader.disable_rewinding();
                assert!(reader.rewind().is_err());
            }
            _ => {
                let len = (op as usize) % buf.len();
                match reader.read(&mut buf[..len]).unwrap() {
                    ReadStatus::Read(n) => pass.extend_from_slice(&buf[..n]),
                    ReadStatus::Eof => assert_eq!(fetched + pass.len(), data.len()),
                }
                // No byte lost or duplicated relative to the source.
                assert_eq!(&pass[..], &data[fetched..fetched + pass.len()]);
            }
        }
    }
});
