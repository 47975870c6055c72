// ==========================================
// 装饰印花车间排产系统 - 标识符规范化
// ==========================================
// 红线: camelCase/snake_case/kebab-case 归一只此一处
// 使用方: 通道解析器 / 质检清单键构造 / 工艺目录加载
// ==========================================

/// 规范化工艺/工序标识符
///
/// 规则:
/// 1. camelCase 边界插入下划线 (screenPrinting → screen_printing)
/// 2. 空白与连字符折叠为下划线
/// 3. 全部小写, 连续下划线折叠, 去除首尾下划线
///
/// 组织侧与系统侧书写的同一标识经此函数后必然相等
pub fn canonical_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev_separator = true; // 抑制开头下划线

    let chars: Vec<char> = raw.chars().collect();
    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_whitespace() || ch == '-' || ch == '_' {
            if !prev_separator {
                out.push('_');
                prev_separator = true;
            }
            continue;
        }

        // camelCase 边界: 小写/数字后跟大写
        if ch.is_uppercase() {
            let prev_is_lower_or_digit = i > 0
                && (chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit());
            if prev_is_lower_or_digit && !prev_separator {
                out.push('_');
            }
        }

        for lower in ch.to_lowercase() {
            out.push(lower);
        }
        prev_separator = false;
    }

    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// canonical_key 的 camelCase 别名 (遗留质检配置使用)
///
/// screen_printing → screenPrinting
pub fn camel_alias(canonical: &str) -> String {
    let mut out = String::with_capacity(canonical.len());
    let mut upper_next = false;
    for ch in canonical.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// 标题化显示名 (generic 通道合成用)
///
/// screen_printing → Screen Printing
pub fn title_case(canonical: &str) -> String {
    canonical
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
