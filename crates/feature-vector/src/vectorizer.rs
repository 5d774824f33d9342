//! Named-Input Vectorization

use crate::{FeatureSchema, VectorError};
use std::collections::HashMap;
use tracing::debug;

/// Assembles named user input into the ordered vector a model expects.
///
/// Domain rules applied uniformly across diseases: every schema field must
/// be present, no field may be negative, and an all-zero form counts as
/// "no real data entered" and is rejected.
pub struct Vectorizer<'a> {
    schema: &'a FeatureSchema,
}

impl<'a> Vectorizer<'a> {
    /// Create a vectorizer over a schema
    pub fn new(schema: &'a FeatureSchema) -> Self {
        Self { schema }
    }

    /// Assemble `fields` into a vector in schema order.
    ///
    /// Extra keys not named by the schema are ignored; form payloads may
    /// carry fields the model was not trained on.
    pub fn vectorize(&self, fields: &HashMap<String, f64>) -> Result<Vec<f64>, VectorError> {
        let mut values = Vec::with_capacity(self.schema.len());

        for name in self.schema.names() {
            let value = *fields.get(name).ok_or_else(|| VectorError::MissingField {
                field: name.to_string(),
            })?;

            if value < 0.0 {
                return Err(VectorError::NegativeValue {
                    field: name.to_string(),
                    value,
                });
            }

            values.push(value);
        }

        if values.iter().all(|v| *v == 0.0) {
            return Err(VectorError::AllZero);
        }

        debug!(len = values.len(), "assembled feature vector");
        Ok(values)
    }
}
