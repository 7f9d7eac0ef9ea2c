//! Arbitrary read-only contract calls driven by a caller-supplied JSON ABI.
//!
//! This is a plain proxy to the node: no caching, no ranking.

use alloy::dyn_abi::{DynSolType, DynSolValue, FunctionExt, JsonAbiExt, Specifier};
use alloy::json_abi::{Function, JsonAbi};
use alloy::primitives::{Address, hex};
use serde_json::{Value, json};

use crate::error::{TokenError, TokenResult};
use crate::node::NodeClient;

/// Parse a JSON ABI given as a list of items.
pub fn parse_abi(items: &[Value]) -> TokenResult<JsonAbi> {
    serde_json::from_value(Value::Array(items.to_vec()))
        .map_err(|e| TokenError::ContractCall(format!("invalid ABI: {e}")))
}

/// Pick the overload of `method` whose arity matches `args`.
fn find_function<'a>(abi: &'a JsonAbi, method: &str, arity: usize) -> TokenResult<&'a Function> {
    let overloads = abi
        .function(method)
        .ok_or_else(|| TokenError::ContractCall(format!("method `{method}` not in ABI")))?;
    overloads
        .iter()
        .find(|f| f.inputs.len() == arity)
        .ok_or_else(|| {
            TokenError::ContractCall(format!(
                "method `{method}` takes no overload with {arity} args"
            ))
        })
}

/// Coerce JSON arguments into ABI values for `function`.
pub fn coerce_args(function: &Function, args: &[Value]) -> TokenResult<Vec<DynSolValue>> {
    function
        .inputs
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            let ty: DynSolType = param
                .resolve()
                .map_err(|e| TokenError::ContractCall(format!("param `{}`: {e}", param.name)))?;
            coerce_value(&ty, arg)
                .map_err(|e| TokenError::ContractCall(format!("param `{}`: {e}", param.name)))
        })
        .collect()
}

/// JSON lists map onto arrays and tuples element by element; scalars go
/// through alloy's string coercion.
fn coerce_value(ty: &DynSolType, arg: &Value) -> Result<DynSolValue, String> {
    match (ty, arg) {
        (DynSolType::Array(inner), Value::Array(items)) => items
            .iter()
            .map(|item| coerce_value(inner, item))
            .collect::<Result<_, _>>()
            .map(DynSolValue::Array),
        (DynSolType::FixedArray(inner, len), Value::Array(items)) => {
            if items.len() != *len {
                return Err(format!("expected {len} elements, got {}", items.len()));
            }
            items
                .iter()
                .map(|item| coerce_value(inner, item))
                .collect::<Result<_, _>>()
                .map(DynSolValue::FixedArray)
        }
        (DynSolType::Tuple(types), Value::Array(items)) => {
            if items.len() != types.len() {
                return Err(format!(
                    "expected {} tuple fields, got {}",
                    types.len(),
                    items.len()
                ));
            }
            types
                .iter()
                .zip(items)
                .map(|(ty, item)| coerce_value(ty, item))
                .collect::<Result<_, _>>()
                .map(DynSolValue::Tuple)
        }
        (_, Value::String(s)) => ty.coerce_str(s).map_err(|e| e.to_string()),
        (_, Value::Bool(b)) => ty.coerce_str(&b.to_string()).map_err(|e| e.to_string()),
        (_, Value::Number(n)) => ty.coerce_str(&n.to_string()).map_err(|e| e.to_string()),
        (_, other) => Err(format!("cannot use {other} as {}", ty.sol_type_name())),
    }
}

/// Render a decoded ABI value as JSON. Integers become decimal strings.
pub fn to_json(value: &DynSolValue) -> Value {
    match value {
        DynSolValue::Bool(b) => json!(b),
        DynSolValue::Int(i, _) => json!(i.to_string()),
        DynSolValue::Uint(u, _) => json!(u.to_string()),
        DynSolValue::FixedBytes(word, size) => json!(format!("0x{}", hex::encode(&word[..*size]))),
        DynSolValue::Address(a) => json!(a.to_checksum(None)),
        DynSolValue::Bytes(b) => json!(format!("0x{}", hex::encode(b))),
        DynSolValue::String(s) => json!(s),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            Value::Array(items.iter().map(to_json).collect())
        }
        other => json!(format!("{other:?}")),
    }
}

/// Call `method` on `contract` through the node and decode the outputs.
///
/// A single output is returned bare; several outputs come back as a list.
pub async fn invoke(
    node: &dyn NodeClient,
    contract: Address,
    abi: &JsonAbi,
    method: &str,
    args: &[Value],
) -> TokenResult<Value> {
    let function = find_function(abi, method, args.len())?;
    let values = coerce_args(function, args)?;
    let calldata = function
        .abi_encode_input(&values)
        .map_err(|e| TokenError::ContractCall(format!("encoding `{method}`: {e}")))?;

    let output = node
        .eth_call(contract, calldata.into())
        .await
        .map_err(|e| TokenError::ContractCall(e.to_string()))?;

    let decoded = function
        .abi_decode_output(&output)
        .map_err(|e| TokenError::ContractCall(format!("decoding `{method}`: {e}")))?;

    Ok(match decoded.as_slice() {
        [single] => to_json(single),
        many => Value::Array(many.iter().map(to_json).collect()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn erc20_abi() -> JsonAbi {
        let items = vec![json!({
            "inputs": [{"name": "_owner", "type": "address"}],
            "name": "balanceOf",
            "outputs": [{"name": "balance", "type": "uint256"}],
            "stateMutability": "view",
            "type": "function"
        })];
        parse_abi(&items).unwrap()
    }

    #[test]
    fn test_coerces_address_arg() {
        let abi = erc20_abi();
        let f = find_function(&abi, "balanceOf", 1).unwrap();
        let values =
            coerce_args(f, &[json!("0x0000000000000000000000000000000000000001")]).unwrap();
        assert_eq!(values.len(), 1);
        assert!(matches!(values[0], DynSolValue::Address(_)));
    }

    #[test]
    fn test_unknown_method_and_arity() {
        let abi = erc20_abi();
        assert!(find_function(&abi, "transfer", 2).is_err());
        assert!(find_function(&abi, "balanceOf", 0).is_err());
    }

    fn function(signature_inputs: Value) -> Function {
        let abi = parse_abi(&[json!({
            "inputs": signature_inputs,
            "name": "f",
            "outputs": [],
            "stateMutability": "view",
            "type": "function"
        })])
        .unwrap();
        abi.function("f").unwrap()[0].clone()
    }

    #[test]
    fn test_coerces_address_array_arg() {
        let f = function(json!([{"name": "a", "type": "address[]"}]));
        let values = coerce_args(
            &f,
            &[json!([
                "0x0000000000000000000000000000000000000001",
                "0x0000000000000000000000000000000000000002"
            ])],
        )
        .unwrap();
        match &values[0] {
            DynSolValue::Array(items) => {
                assert_eq!(items.len(), 2);
                assert!(items.iter().all(|v| matches!(v, DynSolValue::Address(_))));
            }
            other => panic!("expected array, got {other:?}"),
        }
        assert!(f.abi_encode_input(&values).is_ok());
    }

    #[test]
    fn test_coerces_numbers_fixed_arrays_and_tuples() {
        let f = function(json!([
            {"name": "xs", "type": "uint256[2]"},
            {"name": "t", "type": "tuple", "components": [
                {"name": "ok", "type": "bool"},
                {"name": "n", "type": "uint8"}
            ]}
        ]));
        let values = coerce_args(&f, &[json!([1, "2"]), json!([true, 7])]).unwrap();
        assert!(matches!(&values[0], DynSolValue::FixedArray(xs) if xs.len() == 2));
        assert!(matches!(&values[1], DynSolValue::Tuple(fields) if fields.len() == 2));

        let err = coerce_args(&f, &[json!([1, 2, 3]), json!([true, 7])]).unwrap_err();
        assert!(matches!(err, TokenError::ContractCall(msg) if msg.contains("expected 2")));
    }

    #[test]
    fn test_uint_renders_as_string() {
        let raw = alloy::primitives::U256::from(10u64).pow(alloy::primitives::U256::from(30u64));
        let v = DynSolValue::Uint(raw, 256);
        assert_eq!(to_json(&v), json!("1000000000000000000000000000000"));
    }
}
