//! Built-in functions

pub mod criteria;
pub mod date;
pub mod logical;
pub mod math;
pub mod statistical;
pub mod text;

use crate::error::FormulaResult;
use crate::value::FormulaValue;
use ahash::AHashMap;

/// Function implementation signature
///
/// Arguments arrive already evaluated, left to right. Arity has been checked
/// against the [`FunctionDef`] before the call.
pub type FunctionImpl = fn(&[FormulaValue]) -> FormulaResult<FormulaValue>;

/// Function definition
pub struct FunctionDef {
    /// Function name (uppercase)
    pub name: &'static str,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Implementation
    pub implementation: FunctionImpl,
    /// Is volatile (a different result on every recompute)
    pub volatile: bool,
}

/// Function registry
pub struct FunctionRegistry {
    functions: AHashMap<String, FunctionDef>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionRegistry {
    /// Create a new registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self {
            functions: AHashMap::new(),
        };

        registry.register_aggregate_functions();
        registry.register_math_functions();
        registry.register_logical_functions();
        registry.register_text_functions();
        registry.register_criteria_functions();
        registry.register_date_functions();

        registry
    }

    /// Look up a function by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_uppercase())
    }

    /// Register a function
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name.to_uppercase(), def);
    }

    /// Check whether a function exists and is volatile
    pub fn is_volatile(&self, name: &str) -> bool {
        self.get(name).map_or(false, |def| def.volatile)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn register_simple(&mut self, name: &'static str, args: usize, implementation: FunctionImpl) {
        self.register(FunctionDef {
            name,
            min_args: args,
            max_args: Some(args),
            implementation,
            volatile: false,
        });
    }

    fn register_variadic(&mut self, name: &'static str, implementation: FunctionImpl) {
        self.register(FunctionDef {
            name,
            min_args: 1,
            max_args: None,
            implementation,
            volatile: false,
        });
    }

    fn register_aggregate_functions(&mut self) {
        self.register_variadic("SUM", math::fn_sum);
        self.register_variadic("PRODUCT", math::fn_product);
        self.register_variadic("AVERAGE", statistical::fn_average);
        self.register_variadic("MIN", statistical::fn_min);
        self.register_variadic("MAX", statistical::fn_max);
        self.register_variadic("COUNT", statistical::fn_count);
        self.register_variadic("COUNTA", statistical::fn_counta);
        self.register_variadic("MEDIAN", statistical::fn_median);

        // Sample statistics (n - 1)
        self.register_variadic("STDEV", statistical::fn_stdev);
        self.register_variadic("VAR", statistical::fn_var);
    }

    fn register_math_functions(&mut self) {
        self.register_simple("SQRT", 1, math::fn_sqrt);
        self.register_simple("ABS", 1, math::fn_abs);
        self.register_simple("POWER", 2, math::fn_power);
        self.register_simple("EXP", 1, math::fn_exp);
        self.register_simple("LN", 1, math::fn_ln);
        self.register_simple("LOG10", 1, math::fn_log10);
        self.register_simple("SIN", 1, math::fn_sin);
        self.register_simple("COS", 1, math::fn_cos);
        self.register_simple("TAN", 1, math::fn_tan);
        self.register_simple("ASIN", 1, math::fn_asin);
        self.register_simple("ACOS", 1, math::fn_acos);
        self.register_simple("ATAN", 1, math::fn_atan);
        self.register_simple("PI", 0, math::fn_pi);

        // ROUND(number, [digits])
        self.register(FunctionDef {
            name: "ROUND",
            min_args: 1,
            max_args: Some(2),
            implementation: math::fn_round,
            volatile: false,
        });

        // FLOOR(number, [significance])
        self.register(FunctionDef {
            name: "FLOOR",
            min_args: 1,
            max_args: Some(2),
            implementation: math::fn_floor,
            volatile: false,
        });

        // CEILING(number, [significance])
        self.register(FunctionDef {
            name: "CEILING",
            min_args: 1,
            max_args: Some(2),
            implementation: math::fn_ceiling,
            volatile: false,
        });

        // LOG(number, [base])
        self.register(FunctionDef {
            name: "LOG",
            min_args: 1,
            max_args: Some(2),
            implementation: math::fn_log,
            volatile: false,
        });

        // RAND (volatile)
        self.register(FunctionDef {
            name: "RAND",
            min_args: 0,
            max_args: Some(0),
            implementation: math::fn_rand,
            volatile: true,
        });
    }

    fn register_logical_functions(&mut self) {
        // IF(condition, value_if_true, [value_if_false])
        self.register(FunctionDef {
            name: "IF",
            min_args: 2,
            max_args: Some(3),
            implementation: logical::fn_if,
            volatile: false,
        });

        self.register_variadic("AND", logical::fn_and);
        self.register_variadic("OR", logical::fn_or);
        self.register_simple("NOT", 1, logical::fn_not);
    }

    fn register_text_functions(&mut self) {
        self.register_variadic("CONCAT", text::fn_concat);
        self.register_simple("TEXT", 2, text::fn_text);
    }

    fn register_criteria_functions(&mut self) {
        self.register_simple("COUNTIF", 2, criteria::fn_countif);

        // SUMIF(range, criteria, [sum_range])
        self.register(FunctionDef {
            name: "SUMIF",
            min_args: 2,
            max_args: Some(3),
            implementation: criteria::fn_sumif,
            volatile: false,
        });
    }

    fn register_date_functions(&mut self) {
        // NOW (volatile)
        self.register(FunctionDef {
            name: "NOW",
            min_args: 0,
            max_args: Some(0),
            implementation: date::fn_now,
            volatile: true,
        });

        // TODAY (volatile)
        self.register(FunctionDef {
            name: "TODAY",
            min_args: 0,
            max_args: Some(0),
            implementation: date::fn_today,
            volatile: true,
        });
    }
}
