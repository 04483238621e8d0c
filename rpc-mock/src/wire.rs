/// Minimal decoder for submitted legacy transactions
///
/// Decodes just enough of the wire format to apply a single system
/// transfer: signature, message bytes, account keys, blockhash and the
/// instruction payload. Kept independent of the client crate so the mock
/// checks the encoding rather than trusting it.

#[derive(Debug)]
pub struct DecodedTransfer {
    pub signature: [u8; 64],
    /// The signed message bytes (everything after the signature array).
    pub message: Vec<u8>,
    pub from: [u8; 32],
    pub to: [u8; 32],
    pub lamports: u64,
    pub blockhash: String,
}

struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], String> {
        if self.pos + len > self.buf.len() {
            return Err(format!("truncated transaction at offset {}", self.pos));
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, String> {
        Ok(self.take(1)?[0])
    }

    fn compact_u16(&mut self) -> Result<u16, String> {
        let mut value: u16 = 0;
        let mut shift = 0;
        loop {
            let byte = self.u8()?;
            value |= ((byte & 0x7f) as u16) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
            if shift > 14 {
                return Err("compact-u16 overflow".to_string());
            }
        }
    }
}

pub fn decode_transfer(wire: &[u8]) -> Result<DecodedTransfer, String> {
    let mut cur = Cursor { buf: wire, pos: 0 };

    let signature_count = cur.compact_u16()?;
    if signature_count != 1 {
        return Err(format!("expected 1 signature, got {}", signature_count));
    }
    let signature: [u8; 64] = cur.take(64)?.try_into().expect("64-byte slice");

    let message_start = cur.pos;
    let header = cur.take(3)?;
    if header[0] != 1 {
        return Err(format!("expected 1 required signer, got {}", header[0]));
    }

    let key_count = cur.compact_u16()? as usize;
    let mut keys: Vec<[u8; 32]> = Vec::with_capacity(key_count);
    for _ in 0..key_count {
        keys.push(cur.take(32)?.try_into().expect("32-byte slice"));
    }

    let blockhash: [u8; 32] = cur.take(32)?.try_into().expect("32-byte slice");

    let instruction_count = cur.compact_u16()?;
    if instruction_count != 1 {
        return Err(format!("expected 1 instruction, got {}", instruction_count));
    }
    let program_index = cur.u8()? as usize;
    let account_count = cur.compact_u16()? as usize;
    let accounts = cur.take(account_count)?.to_vec();
    let data_len = cur.compact_u16()? as usize;
    let data = cur.take(data_len)?;

    let program = keys
        .get(program_index)
        .ok_or_else(|| format!("program index {} out of range", program_index))?;
    if program != &[0u8; 32] {
        return Err("instruction does not target the system program".to_string());
    }

    if data.len() != 12 || data[..4] != 2u32.to_le_bytes() {
        return Err("instruction is not a system transfer".to_string());
    }
    let lamports = u64::from_le_bytes(data[4..12].try_into().expect("8-byte slice"));

    if accounts.len() != 2 {
        return Err(format!("expected 2 instruction accounts, got {}", accounts.len()));
    }
    let from = *keys
        .get(accounts[0] as usize)
        .ok_or_else(|| "source account index out of range".to_string())?;
    let to = *keys
        .get(accounts[1] as usize)
        .ok_or_else(|| "destination account index out of range".to_string())?;

    Ok(DecodedTransfer {
        signature,
        message: wire[message_start..].to_vec(),
        from,
        to,
        lamports,
        blockhash: bs58::encode(blockhash).into_string(),
    })
}
