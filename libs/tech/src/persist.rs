//! Persisted references to technologies.
//!
//! A reference to a shipped technology is stored by name only. A reference
//! to a user-defined technology also carries its definition location and an
//! embedded copy of the definition, so that a design can be reopened where
//! the definition document is not available.
//!
//! All integers are big-endian. Strings and the definition payload are
//! prefixed by their length as a `u32`; flags are a single byte.

use std::io::{Read, Write};
use std::sync::Arc;

use arcstr::ArcStr;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::definition::TechDefinition;
use crate::error::{EmbedError, PersistError};
use crate::factory::TechnologyFactory;
use crate::registry::Registry;

/// Writes a reference to the technology built by `factory`.
///
/// Serializing the embedded definition is best effort: if the definition
/// cannot be loaded or encoded, an empty payload is written and a warning
/// is logged. Only errors of `writer` are returned.
pub fn write<W: Write>(writer: &mut W, factory: &TechnologyFactory) -> std::io::Result<()> {
    write_str(writer, factory.name())?;
    let user_defined = factory.is_user_defined();
    write_bool(writer, user_defined)?;
    if !user_defined {
        return Ok(());
    }

    let url = factory.url();
    write_bool(writer, url.is_some())?;
    if let Some(url) = url {
        write_str(writer, url)?;
    }

    let payload = match embedded_definition(factory) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(
                "not embedding the definition of technology `{}`: {}",
                factory.name(),
                err
            );
            Vec::new()
        }
    };
    write_bytes(writer, &payload)
}

/// Encodes the definition of `factory` for embedding.
pub(crate) fn embedded_definition(factory: &TechnologyFactory) -> Result<Vec<u8>, EmbedError> {
    let def = factory.definition().ok_or(EmbedError::NoDefinition)??;
    Ok(def.to_bytes()?)
}

/// Reads a technology reference written by [`write`].
///
/// References to shipped technologies resolve to the factory registered in
/// `registry`. References to user-defined technologies produce a new
/// factory holding the embedded definition.
pub fn read<R: Read>(
    reader: &mut R,
    registry: &Registry,
) -> Result<Arc<TechnologyFactory>, PersistError> {
    let name = read_str(reader)?;
    let user_defined = read_bool(reader)?;
    if !user_defined {
        return registry
            .get(&name)
            .cloned()
            .ok_or(PersistError::UnknownTechnology(name));
    }

    let url = if read_bool(reader)? {
        Some(read_str(reader)?)
    } else {
        None
    };
    let payload = read_bytes(reader)?;
    if payload.is_empty() {
        return Err(PersistError::Definition {
            name,
            reason: "the record has no embedded definition".into(),
        });
    }
    let def = TechDefinition::from_bytes(&payload).map_err(|err| PersistError::Definition {
        name: name.clone(),
        reason: err.to_string().into(),
    })?;

    Ok(Arc::new(TechnologyFactory::from_definition(
        name,
        url,
        def,
        registry.implementations().clone(),
    )))
}

fn write_bool<W: Write>(writer: &mut W, value: bool) -> std::io::Result<()> {
    writer.write_u8(value as u8)
}

fn read_bool<R: Read>(reader: &mut R) -> std::io::Result<bool> {
    Ok(reader.read_u8()? != 0)
}

fn write_bytes<W: Write>(writer: &mut W, bytes: &[u8]) -> std::io::Result<()> {
    let len = u32::try_from(bytes.len()).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "field is longer than u32::MAX bytes",
        )
    })?;
    writer.write_u32::<BigEndian>(len)?;
    writer.write_all(bytes)
}

fn read_bytes<R: Read>(reader: &mut R) -> std::io::Result<Vec<u8>> {
    let len = reader.read_u32::<BigEndian>()?;
    let mut bytes = Vec::new();
    reader.by_ref().take(u64::from(len)).read_to_end(&mut bytes)?;
    if bytes.len() != len as usize {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "record ends inside a field",
        ));
    }
    Ok(bytes)
}

fn write_str<W: Write>(writer: &mut W, value: &str) -> std::io::Result<()> {
    write_bytes(writer, value.as_bytes())
}

fn read_str<R: Read>(reader: &mut R) -> Result<ArcStr, PersistError> {
    let bytes = read_bytes(reader)?;
    Ok(String::from_utf8(bytes)?.into())
}
