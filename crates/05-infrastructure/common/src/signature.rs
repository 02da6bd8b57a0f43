//! 签名内省
//!
//! 在没有显式依赖列表时，从可调用对象的签名文本推断有序的依赖名称。
//! 支持 `fn name(a, b)` 形式的括号参数表和 `|a, b|` 形式的闭包头。
//!
//! 处理步骤：
//! 1. 去掉行注释 `// …` 和块注释 `/* … */`
//! 2. 取出第一个参数表（先出现的 `(` 或 `|`）
//! 3. 在嵌套深度为零的逗号处切分
//! 4. 每个参数去掉空白、`mut` 前缀和类型标注，再去掉一对首尾下划线

/// 从签名文本解析依赖名称
pub fn parse_parameters(source: &str) -> Vec<String> {
    let stripped = strip_comments(source);
    let Some(list) = parameter_list(&stripped) else {
        tracing::trace!("签名中没有参数表: {}", source);
        return Vec::new();
    };

    split_top_level(list)
        .into_iter()
        .filter_map(parameter_name)
        .collect()
}

/// 去掉行注释和块注释
pub fn strip_comments(source: &str) -> String {
    let mut result = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '/' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('/') => {
                // 行注释保留换行符
                for next in chars.by_ref() {
                    if next == '\n' {
                        result.push('\n');
                        break;
                    }
                }
            }
            Some('*') => {
                chars.next();
                let mut previous = '\0';
                for next in chars.by_ref() {
                    if previous == '*' && next == '/' {
                        break;
                    }
                    previous = next;
                }
            }
            _ => result.push(ch),
        }
    }

    result
}

/// 取出第一个参数表的内容（不含定界符）
pub fn parameter_list(source: &str) -> Option<&str> {
    let start = source.find(['(', '|'])?;
    let body = &source[start + 1..];

    if source[start..].starts_with('|') {
        return body.find('|').map(|end| &body[..end]);
    }

    let mut depth = 0usize;
    for (index, ch) in body.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' if depth == 0 => return Some(&body[..index]),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// 在嵌套深度为零的逗号处切分
pub fn split_top_level(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut previous = '\0';

    for (index, ch) in list.char_indices() {
        match ch {
            '<' | '(' | '[' | '{' => depth += 1,
            // `->` 中的 `>` 不是闭合符号
            '>' if previous == '-' => {}
            '>' | ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&list[start..index]);
                start = index + 1;
            }
            _ => {}
        }
        previous = ch;
    }
    parts.push(&list[start..]);
    parts
}

/// 单个参数的依赖名称
fn parameter_name(parameter: &str) -> Option<String> {
    let pattern = parameter.split(':').next().unwrap_or(parameter).trim();
    let pattern = pattern.strip_prefix("mut ").map_or(pattern, str::trim);
    if pattern.is_empty() {
        return None;
    }
    Some(strip_underscore_pair(pattern).to_string())
}

/// 去掉一对首尾下划线（`_name_` → `name`）
fn strip_underscore_pair(name: &str) -> &str {
    if name.len() >= 3 && name.starts_with('_') && name.ends_with('_') {
        &name[1..name.len() - 1]
    } else {
        name
    }
}
