use std::fmt;
use std::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, Error, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::shape::Shape;
use crate::slice::TensorSliceBase;
use crate::storage::Storage;
use crate::tensor::{AsView, Tensor, TensorBase};

/// Serialize a tensor or view as a `{"shape": [..], "data": [..]}` struct.
fn serialize_view<V, Sr>(view: &V, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
where
    V: AsView + ?Sized,
    V::Unit: Serialize,
    Sr: Serializer,
{
    let mut tensor = serializer.serialize_struct("Tensor", 2)?;
    tensor.serialize_field("shape", view.shape())?;
    tensor.serialize_field("data", view.units())?;
    tensor.end()
}

impl Serialize for Shape {
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<T: Serialize> Serialize for TensorBase<T> {
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        serialize_view(self, serializer)
    }
}

impl<S: Storage> Serialize for TensorSliceBase<S>
where
    S::Unit: Serialize,
{
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        serialize_view(self, serializer)
    }
}

struct TensorVisitor<T> {
    unit_marker: PhantomData<T>,
}

impl<'de, T> Visitor<'de> for TensorVisitor<T>
where
    T: Deserialize<'de>,
{
    type Value = Tensor<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a tensor with \"shape\" and \"data\" fields")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut data: Option<Vec<T>> = None;
        let mut shape: Option<Vec<usize>> = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "data" => {
                    if data.is_some() {
                        return Err(A::Error::duplicate_field("data"));
                    }
                    data = Some(map.next_value()?);
                }
                "shape" => {
                    if shape.is_some() {
                        return Err(A::Error::duplicate_field("shape"));
                    }
                    shape = Some(map.next_value()?);
                }
                _ => {
                    return Err(A::Error::unknown_field(&key, &["data", "shape"]));
                }
            }
        }

        let Some(shape) = shape else {
            return Err(A::Error::missing_field("shape"));
        };
        let Some(data) = data else {
            return Err(A::Error::missing_field("data"));
        };

        Tensor::from_data(shape, data)
            .map_err(|_| A::Error::custom("data length does not match shape product"))
    }
}

impl<'de, T> Deserialize<'de> for TensorBase<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<TensorBase<T>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_struct(
            "Tensor",
            &["shape", "data"],
            TensorVisitor::<T> {
                unit_marker: PhantomData,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::Tensor;

    #[test]
    fn test_deserialize_serialize() {
        struct Case<'a> {
            json: &'a str,
            expected: Result<Tensor<f32>, String>,
        }

        let cases = [
            Case {
                json: "[]",
                expected: Err("expected a tensor with \"shape\" and \"data\" fields".into()),
            },
            Case {
                json: r#"{"data":[]}"#,
                expected: Err("missing field `shape`".into()),
            },
            Case {
                json: r#"{"data":[], "data": []}"#,
                expected: Err("duplicate field `data`".into()),
            },
            Case {
                json: r#"{"shape":[]}"#,
                expected: Err("missing field `data`".into()),
            },
            Case {
                json: r#"{"shape":[], "data": [2.5]}"#,
                expected: Ok(Tensor::scalar(2.5)),
            },
            Case {
                json: r#"{"data": [1.0, 0.5, 2.0, 1.5], "shape": [2, 2]}"#,
                expected: Ok(Tensor::from_data([2, 2], vec![1.0, 0.5, 2.0, 1.5]).unwrap()),
            },
            Case {
                json: r#"{"data": [1.0, 0.5, 2.0, 1.5], "shape": [2, 3]}"#,
                expected: Err("data length does not match shape product".into()),
            },
        ];

        for Case { json, expected } in cases {
            let actual: Result<Tensor<f32>, String> =
                serde_json::from_str(json).map_err(|e| e.to_string());
            match (actual, expected) {
                (Ok(actual), Ok(expected)) => {
                    assert_eq!(actual, expected);

                    // Serializing the result should produce the original JSON.
                    let actual_json = serde_json::to_value(actual).unwrap();
                    let expected_json: serde_json::Value = serde_json::from_str(json).unwrap();
                    assert_eq!(actual_json, expected_json);
                }
                (Err(actual_err), Err(expected_err)) => assert!(
                    actual_err.contains(&expected_err),
                    "expected \"{}\" to contain \"{}\"",
                    actual_err,
                    expected_err
                ),
                (actual, expected) => assert_eq!(actual, expected),
            }
        }
    }

    #[test]
    fn test_serialize_view() {
        let tensor = Tensor::increasing_from([3, 2], 0);
        let json = serde_json::to_value(tensor.slice(1..)).unwrap();
        let expected: serde_json::Value =
            serde_json::from_str(r#"{"shape": [2, 2], "data": [2, 3, 4, 5]}"#).unwrap();
        assert_eq!(json, expected);
    }
}
