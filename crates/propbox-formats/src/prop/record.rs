//! Prop entity and its single-record codec

use binrw::{BinRead, BinResult, BinWrite, Endian};
use std::io::{Cursor, Read, Seek, Write};

use crate::endian::{CUE_SIZE, cue_bytes, detect_at, native_endian};
use crate::error::{FormatError, Result};
use crate::prop::layout::HEADER_SIZE;

/// A placed object instance in a world.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Prop {
    /// Unique within a world
    pub id: u32,
    /// World the prop belongs to
    pub world_id: u32,
    /// Owner / creator
    pub user_id: u32,
    /// Milliseconds since the Unix epoch
    pub date: i64,
    /// Position in meters
    pub x: f64,
    /// Position in meters
    pub y: f64,
    /// Position in meters
    pub z: f64,
    /// Rotation in radians
    pub yaw: f32,
    /// Rotation in radians
    pub pitch: f32,
    /// Rotation in radians
    pub roll: f32,
    /// Model or resource identifier
    pub name: String,
    /// Free text, may be empty
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Scripted behavior, may be empty
    #[cfg_attr(feature = "serde", serde(default))]
    pub action: String,
}

impl Prop {
    /// Create a prop at the origin with no rotation and empty text fields.
    pub fn new(id: u32, world_id: u32, user_id: u32, date: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            world_id,
            user_id,
            date,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f64, y: f64, z: f64) -> Self {
        self.x = x;
        self.y = y;
        self.z = z;
        self
    }

    /// Set the rotation
    pub fn with_rotation(mut self, yaw: f32, pitch: f32, roll: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch;
        self.roll = roll;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the action
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Size of this prop once serialized.
    pub fn serialized_len(&self) -> usize {
        HEADER_SIZE + self.name.len() + self.description.len() + self.action.len()
    }

    /// Serialize in native byte order.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        self.serialize_with_endian(native_endian())
    }

    /// Serialize in an explicit byte order.
    ///
    /// Readers on any machine accept either order; this exists mainly to
    /// produce foreign-order data.
    pub fn serialize_with_endian(&self, endian: Endian) -> Result<Vec<u8>> {
        let header = PropHeader::for_prop(self)?;

        let mut buffer = Vec::with_capacity(self.serialized_len());
        let mut cursor = Cursor::new(&mut buffer);
        header.write_options(&mut cursor, endian, ())?;
        cursor.write_all(self.name.as_bytes())?;
        cursor.write_all(self.description.as_bytes())?;
        cursor.write_all(self.action.as_bytes())?;

        Ok(buffer)
    }

    /// Parse a single serialized prop.
    ///
    /// Either byte order is accepted. Bytes past the end of the text block
    /// are ignored.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(FormatError::InvalidPayload {
                expected: HEADER_SIZE,
                actual: data.len(),
            });
        }
        let endian = detect_at(data)?;

        let mut cursor = Cursor::new(data);
        let header = PropHeader::read_options(&mut cursor, endian, ())?;

        let lens = [
            usize::from(header.name_len),
            usize::from(header.description_len),
            usize::from(header.action_len),
        ];
        let total = HEADER_SIZE + lens.iter().sum::<usize>();
        if data.len() < total {
            return Err(FormatError::InvalidPayload {
                expected: total,
                actual: data.len(),
            });
        }

        let mut offset = HEADER_SIZE;
        let name = take_text(data, &mut offset, lens[0], "name")?;
        let description = take_text(data, &mut offset, lens[1], "description")?;
        let action = take_text(data, &mut offset, lens[2], "action")?;

        Ok(Self {
            id: header.id,
            world_id: header.world_id,
            user_id: header.user_id,
            date: header.date,
            x: header.x,
            y: header.y,
            z: header.z,
            yaw: header.yaw,
            pitch: header.pitch,
            roll: header.roll,
            name,
            description,
            action,
        })
    }
}

impl crate::PropFormat for Prop {
    fn parse(data: &[u8]) -> Result<Self> {
        Self::deserialize(data)
    }

    fn build(&self) -> Result<Vec<u8>> {
        self.serialize()
    }
}

/// Fixed 0x42-byte header of a prop record
#[derive(Debug, Clone, PartialEq)]
struct PropHeader {
    id: u32,
    world_id: u32,
    user_id: u32,
    date: i64,
    x: f64,
    y: f64,
    z: f64,
    yaw: f32,
    pitch: f32,
    roll: f32,
    name_len: u16,
    description_len: u16,
    action_len: u16,
}

fn take_text(data: &[u8], offset: &mut usize, len: usize, field: &'static str) -> Result<String> {
    let bytes = &data[*offset..*offset + len];
    *offset += len;
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| FormatError::InvalidUtf8 { field })
}

fn text_len(field: &'static str, text: &str) -> Result<u16> {
    u16::try_from(text.len()).map_err(|_| FormatError::FieldTooLong {
        field,
        length: text.len(),
    })
}

impl PropHeader {
    fn for_prop(prop: &Prop) -> Result<Self> {
        Ok(Self {
            id: prop.id,
            world_id: prop.world_id,
            user_id: prop.user_id,
            date: prop.date,
            x: prop.x,
            y: prop.y,
            z: prop.z,
            yaw: prop.yaw,
            pitch: prop.pitch,
            roll: prop.roll,
            name_len: text_len("name", &prop.name)?,
            description_len: text_len("description", &prop.description)?,
            action_len: text_len("action", &prop.action)?,
        })
    }
}

impl BinRead for PropHeader {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let pos = reader.stream_position()?;
        let mut cue = [0u8; CUE_SIZE];
        reader.read_exact(&mut cue)?;
        if cue != cue_bytes(endian) {
            return Err(binrw::Error::BadMagic {
                pos,
                found: Box::new(cue),
            });
        }

        Ok(Self {
            id: u32::read_options(reader, endian, ())?,
            world_id: u32::read_options(reader, endian, ())?,
            user_id: u32::read_options(reader, endian, ())?,
            date: i64::read_options(reader, endian, ())?,
            x: f64::read_options(reader, endian, ())?,
            y: f64::read_options(reader, endian, ())?,
            z: f64::read_options(reader, endian, ())?,
            yaw: f32::read_options(reader, endian, ())?,
            pitch: f32::read_options(reader, endian, ())?,
            roll: f32::read_options(reader, endian, ())?,
            name_len: u16::read_options(reader, endian, ())?,
            description_len: u16::read_options(reader, endian, ())?,
            action_len: u16::read_options(reader, endian, ())?,
        })
    }
}

impl BinWrite for PropHeader {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        writer.write_all(&cue_bytes(endian))?;
        self.id.write_options(writer, endian, ())?;
        self.world_id.write_options(writer, endian, ())?;
        self.user_id.write_options(writer, endian, ())?;
        self.date.write_options(writer, endian, ())?;
        self.x.write_options(writer, endian, ())?;
        self.y.write_options(writer, endian, ())?;
        self.z.write_options(writer, endian, ())?;
        self.yaw.write_options(writer, endian, ())?;
        self.pitch.write_options(writer, endian, ())?;
        self.roll.write_options(writer, endian, ())?;
        self.name_len.write_options(writer, endian, ())?;
        self.description_len.write_options(writer, endian, ())?;
        self.action_len.write_options(writer, endian, ())?;
        Ok(())
    }
}
