//! 容器端到端集成测试
//!
//! 样例组件图：
//! - `ClassE`、`ClassD`、`ClassA` 按类型注册，名称由驼峰命名推导
//! - `ClassC` 手动命名为 `classC`，`ClassB` 自定义命名为 `classBx`
//! - `ClassA` 通过签名声明构造依赖，通过属性注入 `classBx`/`classCx`，
//!   并在构造后执行 `initialize`
//! - `classX → classY → classZ → classX` 构成循环

use inject_common::{
    downcast, inject_fn, instance, Args, Callable, Constructible, Dependencies, InjectError,
    InjectResult, Injectable, Instance, Locals, ServiceType, TypeInfo,
};
use inject_composition::{ContainerBuilder, ContainerSettings, RegistrationModule};
use inject_impl::Injector;
use inject_registry::{Inject, InjectExt, Registry};
use once_cell::sync::OnceCell;
use std::io::Write;
use std::sync::Arc;

/// 属性只接受第一次注入
fn set_property<T: Send + Sync + 'static>(
    cell: &OnceCell<Arc<T>>,
    key: &str,
    value: Instance,
) -> InjectResult<()> {
    let _ = cell.set(downcast(key, value)?);
    Ok(())
}

#[derive(Debug)]
struct ClassE {
    id: i32,
}

impl Injectable for ClassE {}

impl Constructible for ClassE {
    fn dependencies() -> Dependencies {
        Dependencies::none()
    }

    fn construct(_args: &mut Args) -> InjectResult<Self> {
        Ok(Self { id: 10 })
    }
}

#[derive(Debug)]
struct ClassD;

impl Injectable for ClassD {}

impl Constructible for ClassD {
    fn dependencies() -> Dependencies {
        Dependencies::signature("fn new()")
    }

    fn construct(_args: &mut Args) -> InjectResult<Self> {
        Ok(Self)
    }
}

#[derive(Debug)]
struct ClassC;

impl Injectable for ClassC {}

#[derive(Debug, Default)]
struct ClassB {
    class_c: OnceCell<Arc<ClassC>>,
}

impl Injectable for ClassB {
    fn inject_property(&self, key: &str, value: Instance) -> InjectResult<()> {
        match key {
            "classC" => set_property(&self.class_c, key, value),
            _ => Err(InjectError::unknown_property("ClassB", key)),
        }
    }
}

impl Constructible for ClassB {
    fn dependencies() -> Dependencies {
        Dependencies::none()
    }

    fn construct(_args: &mut Args) -> InjectResult<Self> {
        Ok(Self::default())
    }
}

#[derive(Debug)]
struct ClassA {
    prop: String,
    prop2: OnceCell<i32>,
    class_d: Arc<ClassD>,
    class_e: Arc<ClassE>,
    value: Arc<&'static str>,
    factory: Arc<i32>,
    class_bx: OnceCell<Arc<ClassB>>,
    class_cx: OnceCell<Arc<ClassC>>,
}

impl Injectable for ClassA {
    fn inject_property(&self, key: &str, value: Instance) -> InjectResult<()> {
        match key {
            "classBx" => set_property(&self.class_bx, key, value),
            "classCx" => set_property(&self.class_cx, key, value),
            _ => Err(InjectError::unknown_property("ClassA", key)),
        }
    }

    fn post_construct(&self, method: &str) -> InjectResult<()> {
        match method {
            "initialize" => {
                let _ = self.prop2.set(890);
                Ok(())
            }
            _ => Err(InjectError::unknown_method("ClassA", method)),
        }
    }
}

impl Constructible for ClassA {
    fn dependencies() -> Dependencies {
        Dependencies::signature(
            "fn new(classD: Arc<ClassD>, classE: Arc<ClassE>, value: Arc<&str>, factory: Arc<i32>)",
        )
    }

    fn construct(args: &mut Args) -> InjectResult<Self> {
        Ok(Self {
            prop: "ok".to_string(),
            prop2: OnceCell::new(),
            class_d: args.next()?,
            class_e: args.next()?,
            value: args.next()?,
            factory: args.next()?,
            class_bx: OnceCell::new(),
            class_cx: OnceCell::new(),
        })
    }
}

macro_rules! chain_link {
    ($name:ident, $signature:literal, $next:ty) => {
        #[derive(Debug)]
        struct $name {
            next: Arc<$next>,
        }

        impl Injectable for $name {}

        impl Constructible for $name {
            fn dependencies() -> Dependencies {
                Dependencies::signature($signature)
            }

            fn construct(args: &mut Args) -> InjectResult<Self> {
                Ok(Self { next: args.next()? })
            }
        }
    };
}

chain_link!(ClassX, "fn new(classY: Arc<ClassY>)", ClassY);
chain_link!(ClassY, "fn new(classZ: Arc<ClassZ>)", ClassZ);
chain_link!(ClassZ, "fn new(classX: Arc<ClassX>)", ClassX);

/// 样例组件图的注册模块
struct SampleModule;

impl RegistrationModule for SampleModule {
    fn name(&self) -> &str {
        "sample"
    }

    fn register(&self, registry: &Registry) -> InjectResult<()> {
        registry.register_service_by_type(ServiceType::of::<ClassE>());
        registry.register_service_by_type(ServiceType::of::<ClassD>());
        registry.register_service(
            "classC",
            ServiceType::new::<ClassC, _>(Dependencies::none(), |_| Ok(ClassC)),
        );

        registry.register_service("classBx", ServiceType::of::<ClassB>());
        registry.register_property("classC", TypeInfo::of::<ClassB>(), "classC");

        registry.register_service_by_type(ServiceType::of::<ClassA>());
        registry.register_property("classBx", TypeInfo::of::<ClassA>(), "classBx");
        registry.register_property("classC", TypeInfo::of::<ClassA>(), "classCx");
        registry.register_post_construct(TypeInfo::of::<ClassA>(), "initialize");

        registry.register_factory("factory", Callable::returning(123_i32).named("factory"));
        registry.register_value("value", instance("PASS"));

        registry.register_service_by_type(ServiceType::of::<ClassX>());
        registry.register_service_by_type(ServiceType::of::<ClassY>());
        registry.register_service_by_type(ServiceType::of::<ClassZ>());
        Ok(())
    }
}

fn registry() -> Arc<Registry> {
    ContainerBuilder::new()
        .with_settings(ContainerSettings::default())
        .add_module(SampleModule)
        .build()
        .expect("sample registry")
}

fn injector() -> Box<dyn Inject> {
    registry().create_injector().expect("injector factory installed")
}

#[test]
fn resolves_full_graph() -> anyhow::Result<()> {
    let injector = injector();
    let class_a = injector.get_as::<ClassA>("classA")?;

    assert_eq!(class_a.prop, "ok");
    assert_eq!(class_a.prop2.get(), Some(&890));
    assert_eq!(*class_a.value, "PASS");
    assert_eq!(*class_a.factory, 123);
    assert_eq!(class_a.class_e.id, 10);

    let class_bx = class_a.class_bx.get().expect("classBx injected");
    let class_cx = class_a.class_cx.get().expect("classCx injected");
    let nested_c = class_bx.class_c.get().expect("classC injected into ClassB");
    assert!(Arc::ptr_eq(class_cx, nested_c));
    assert!(Arc::ptr_eq(&class_a.class_d, &injector.get_as::<ClassD>("classD")?));
    Ok(())
}

#[test]
fn repeated_get_returns_same_instance() -> anyhow::Result<()> {
    let injector = injector();
    let first = injector.get_as::<ClassA>("classA")?;
    let second = injector.get_as::<ClassA>("classA")?;
    assert!(Arc::ptr_eq(&first, &second));
    Ok(())
}

#[test]
fn separate_injectors_do_not_share_cache() -> anyhow::Result<()> {
    let registry = registry();
    let left = registry.create_injector()?;
    let right = registry.create_injector()?;
    assert!(!Arc::ptr_eq(
        &left.get_as::<ClassE>("classE")?,
        &right.get_as::<ClassE>("classE")?
    ));
    Ok(())
}

#[test]
fn detects_circular_reference() {
    let injector = injector();
    let error = injector.get("classX").unwrap_err();
    assert_eq!(error.to_string(), "inject: 'classX' has circular reference");

    match error {
        InjectError::CircularReference { name, chain } => {
            assert_eq!(name, "classX");
            assert_eq!(chain, ["classX", "classY", "classZ", "classX"]);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn cycle_inside_chain_is_reported_for_reentered_name() {
    let injector = injector();
    match injector.get("classY") {
        Err(InjectError::CircularReference { name, .. }) => assert_eq!(name, "classY"),
        other => panic!("unexpected: {other:?}"),
    }

    // 失败不会污染缓存
    assert!(matches!(
        injector.get("classX"),
        Err(InjectError::CircularReference { .. })
    ));
    assert!(injector.get_as::<ClassE>("classE").is_ok());
}

#[test]
fn reports_unregistered_name() {
    let injector = injector();
    let error = injector.get("xqwzts").unwrap_err();
    assert_eq!(error.to_string(), "inject: 'xqwzts' is not registered");
    assert!(error.is_resolution_failure());
}

#[test]
fn has_checks_registration_without_resolving() {
    let injector = injector();
    assert!(injector.has("classA"));
    assert!(injector.has("classX"));
    assert!(!injector.has("xqwzts"));
}

#[test]
fn invokes_function_with_locals() -> anyhow::Result<()> {
    let injector = injector();
    let mut locals = Locals::new();
    locals.insert("num".to_string(), instance(5_i32));

    let sum = inject_fn!(|classE: Arc<ClassE>, num: Arc<i32>| classE.id + *num);
    let result = injector.invoke_as::<i32>(&sum, None, Some(&locals))?;
    assert_eq!(*result, 15);

    // 本地依赖不进入缓存
    assert!(!injector.has("num"));
    assert!(matches!(
        injector.invoke(&sum, None, None),
        Err(InjectError::NotRegistered { name }) if name == "num"
    ));
    Ok(())
}

#[test]
fn registered_names_shadow_locals() -> anyhow::Result<()> {
    let injector = injector();
    let mut locals = Locals::new();
    locals.insert("value".to_string(), instance("LOCAL"));

    let read = inject_fn!(["value"] => |v: Arc<&'static str>| v.to_string());
    let result = injector.invoke_as::<String>(&read, None, Some(&locals))?;
    assert_eq!(*result, "PASS");
    Ok(())
}

#[test]
fn instantiates_class_with_property_injection() -> anyhow::Result<()> {
    let injector = injector();
    let class_b = injector.instantiate_as::<ClassB>(&ServiceType::of::<ClassB>(), None)?;
    let class_c = class_b.class_c.get().expect("classC injected");

    assert!(Arc::ptr_eq(class_c, &injector.get_as::<ClassC>("classC")?));
    let another = injector.instantiate_as::<ClassB>(&ServiceType::of::<ClassB>(), None)?;
    assert!(!Arc::ptr_eq(&class_b, &another));
    Ok(())
}

#[test]
fn lists_registered_names() {
    let names = registry().get_names();
    assert!(names.len() >= 7);
    for expected in [
        "classA", "classBx", "classD", "classE", "classX", "classY", "classZ",
    ] {
        assert!(names.contains(expected), "missing {expected}");
    }
}

#[test]
fn later_registration_replaces_binding() -> anyhow::Result<()> {
    let registry = registry();
    registry.register_value("value", instance("REPLACED"));

    let injector = registry.create_injector()?;
    assert_eq!(*injector.get_as::<&str>("value")?, "REPLACED");
    Ok(())
}

#[derive(Debug)]
struct Left {
    right: OnceCell<Arc<Right>>,
}

impl Injectable for Left {
    fn inject_property(&self, key: &str, value: Instance) -> InjectResult<()> {
        set_property(&self.right, key, value)
    }
}

#[derive(Debug)]
struct Right {
    left: OnceCell<Arc<Left>>,
}

impl Injectable for Right {
    fn inject_property(&self, key: &str, value: Instance) -> InjectResult<()> {
        set_property(&self.left, key, value)
    }
}

fn bare_registry() -> Arc<Registry> {
    let registry = Arc::new(Registry::new());
    Injector::install(&registry);
    registry
}

#[test]
fn mutual_property_injection_resolves_through_cache() -> anyhow::Result<()> {
    let registry = bare_registry();
    registry.register_service(
        "left",
        ServiceType::new::<Left, _>(Dependencies::none(), |_| {
            Ok(Left {
                right: OnceCell::new(),
            })
        }),
    );
    registry.register_service(
        "right",
        ServiceType::new::<Right, _>(Dependencies::none(), |_| {
            Ok(Right {
                left: OnceCell::new(),
            })
        }),
    );
    registry.register_property("right", TypeInfo::of::<Left>(), "right");
    registry.register_property("left", TypeInfo::of::<Right>(), "left");

    let injector = registry.create_injector()?;
    let left = injector.get_as::<Left>("left")?;
    let right = left.right.get().expect("right injected");
    let back = right.left.get().expect("left injected");

    assert!(Arc::ptr_eq(&left, back));
    assert!(Arc::ptr_eq(right, &injector.get_as::<Right>("right")?));
    Ok(())
}

#[test]
fn self_referencing_property_resolves_to_same_instance() -> anyhow::Result<()> {
    #[derive(Debug)]
    struct Node {
        parent: OnceCell<Arc<Node>>,
    }

    impl Injectable for Node {
        fn inject_property(&self, key: &str, value: Instance) -> InjectResult<()> {
            set_property(&self.parent, key, value)
        }
    }

    let registry = bare_registry();
    registry.register_service(
        "node",
        ServiceType::new::<Node, _>(Dependencies::none(), |_| {
            Ok(Node {
                parent: OnceCell::new(),
            })
        }),
    );
    registry.register_property("node", TypeInfo::of::<Node>(), "parent");

    let injector = registry.create_injector()?;
    let node = injector.get_as::<Node>("node")?;
    assert!(Arc::ptr_eq(&node, node.parent.get().expect("parent injected")));
    Ok(())
}

#[test]
fn constructor_self_dependency_is_still_detected() {
    let registry = bare_registry();
    registry.register_service(
        "owner",
        ServiceType::new::<Left, _>(Dependencies::explicit(["owner"]), |_| {
            Ok(Left {
                right: OnceCell::new(),
            })
        }),
    );

    let injector = registry.create_injector().expect("factory installed");
    assert!(matches!(
        injector.get("owner"),
        Err(InjectError::CircularReference { name, .. }) if name == "owner"
    ));
}

#[test]
fn settings_file_drives_naming_across_crates() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(file, "naming = \"snake_case\"")?;

    let injector = ContainerBuilder::new()
        .with_settings_file(file.path())
        .add_fn_module("snake", |registry| {
            registry.register_service_by_type(ServiceType::of::<ClassE>());
            registry.register_service_by_type(ServiceType::of::<ClassB>());
            registry.register_property("class_e", TypeInfo::of::<ClassB>(), "classC");
            Ok(())
        })
        .build_injector()?;

    assert!(injector.has("class_e"));
    assert!(!injector.has("classE"));
    assert_eq!(injector.get_as::<ClassE>("class_e")?.id, 10);

    // 属性值类型不符时报告属性名
    assert!(matches!(
        injector.get("class_b"),
        Err(InjectError::TypeMismatch { name, .. }) if name == "classC"
    ));
    Ok(())
}

#[test]
fn concurrent_gets_share_one_instance() {
    let injector: Arc<dyn Inject> = Arc::from(injector());

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let injector = Arc::clone(&injector);
                scope.spawn(move || injector.get_as::<ClassA>("classA").expect("classA"))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("thread"))
            .collect()
    });

    for result in &results[1..] {
        assert!(Arc::ptr_eq(&results[0], result));
    }
}
