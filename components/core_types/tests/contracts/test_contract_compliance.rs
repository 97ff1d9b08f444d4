//! Contract compliance tests for core_types
//!
//! These tests pin the public surface the built-ins and the async runtime
//! rely on.

use core_types::{ArrayData, ArrayRef, FunctionRef, JsError, JsResult, NativeFunction, Value};

#[cfg(test)]
mod value_contract_tests {
    use super::*;

    #[test]
    fn test_value_has_all_variants() {
        let _: Value = Value::Undefined;
        let _: Value = Value::Null;
        let _: Value = Value::Boolean(true);
        let _: Value = Value::Smi(0);
        let _: Value = Value::Double(0.0);
        let _: Value = Value::String(String::new());
        let _: Value = Value::BigInt(0i32.into());
        let _: Value = Value::array(vec![]);
        let _: Value = Value::function("f", |_| Ok(Value::Undefined));
        let _: Value = Value::native(0u32);
    }

    #[test]
    fn test_as_array_returns_shared_storage() {
        let arr = Value::array(vec![Value::Smi(1)]);
        let data: &ArrayRef = arr.as_array().unwrap();
        assert_eq!(data.borrow().len(), 1);
        assert!(Value::Null.as_array().is_none());
    }

    #[test]
    fn test_as_function_returns_handle() {
        let f = Value::function("f", |_| Ok(Value::Smi(1)));
        let func: &FunctionRef = f.as_function().unwrap();
        assert_eq!(func.call(vec![]).unwrap(), Value::Smi(1));
    }

    #[test]
    fn test_value_is_clone() {
        let v = Value::string("x");
        assert_eq!(v.clone(), v);
    }
}

#[cfg(test)]
mod array_contract_tests {
    use super::*;

    #[test]
    fn test_array_data_elements_are_optional_slots() {
        let data = ArrayData {
            elements: vec![Some(Value::Smi(1)), None],
        };
        assert_eq!(data.len(), 2);
        assert_eq!(data.populated(), 1);
    }
}

#[cfg(test)]
mod error_contract_tests {
    use super::*;

    fn fails() -> JsResult<Value> {
        Err(JsError::EmptyReduce)
    }

    #[test]
    fn test_js_result_alias() {
        assert!(matches!(fails(), Err(JsError::EmptyReduce)));
    }

    #[test]
    fn test_native_function_propagates_errors() {
        let f = NativeFunction::new("f", |_| Err(JsError::invalid_argument("bad")));
        assert!(matches!(f.call(vec![]), Err(JsError::InvalidArgument(_))));
    }
}
