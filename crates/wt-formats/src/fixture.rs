//! In-memory WAV builders for unit tests.

/// Raw `fmt ` fields, written verbatim so tests can make them disagree.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FmtFields {
    pub tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits: u16,
}

impl FmtFields {
    pub fn pcm_stereo_16() -> Self {
        Self::pcm(2, 44100, 16)
    }

    /// Consistent PCM fields for the given shape.
    pub fn pcm(channels: u16, sample_rate: u32, bits: u16) -> Self {
        let block_align = channels * (bits / 8);
        Self {
            tag: 1,
            channels,
            sample_rate,
            byte_rate: sample_rate * block_align as u32,
            block_align,
            bits,
        }
    }

    pub fn body(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(16);
        buf.extend(&self.tag.to_le_bytes());
        buf.extend(&self.channels.to_le_bytes());
        buf.extend(&self.sample_rate.to_le_bytes());
        buf.extend(&self.byte_rate.to_le_bytes());
        buf.extend(&self.block_align.to_le_bytes());
        buf.extend(&self.bits.to_le_bytes());
        buf
    }
}

pub(crate) fn chunk(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + body.len());
    buf.extend(id);
    buf.extend(&(body.len() as u32).to_le_bytes());
    buf.extend(body);
    buf
}

/// `fmt ` chunk with an optional extension (size field + payload).
pub(crate) fn fmt_chunk(fields: &FmtFields, extension: Option<&[u8]>) -> Vec<u8> {
    let mut body = fields.body();
    if let Some(ext) = extension {
        body.extend(&(ext.len() as u16).to_le_bytes());
        body.extend(ext);
    }
    chunk(b"fmt ", &body)
}

pub(crate) fn data_chunk(frames: &[(i16, i16)]) -> Vec<u8> {
    let pcm: Vec<u8> = frames
        .iter()
        .flat_map(|&(l, r)| l.to_le_bytes().into_iter().chain(r.to_le_bytes()))
        .collect();
    chunk(b"data", &pcm)
}

pub(crate) fn riff(chunks: &[Vec<u8>]) -> Vec<u8> {
    let body: Vec<u8> = chunks.concat();
    let mut buf = Vec::with_capacity(12 + body.len());
    buf.extend(b"RIFF");
    buf.extend(&(4 + body.len() as u32).to_le_bytes());
    buf.extend(b"WAVE");
    buf.extend(body);
    buf
}

/// The common case: one `fmt ` chunk, then the frames.
pub(crate) fn simple_wav(frames: &[(i16, i16)]) -> Vec<u8> {
    riff(&[fmt_chunk(&FmtFields::pcm_stereo_16(), None), data_chunk(frames)])
}
